use futures_util::{SinkExt, StreamExt};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use url::Url;

use koz_maca_core::{Bid, ClientMessage, ServerMessage};

mod host;
mod render;

use host::HostHandshake;
use render::render_message;

const DEFAULT_SERVER: &str = "ws://127.0.0.1:25917/ws";

/// 一行用户输入对应的操作
#[derive(Debug, PartialEq)]
enum Command {
    Send(ClientMessage),
    Help,
    Exit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["new"] => Ok(Command::Send(ClientMessage::NewHand)),
        ["play"] => Ok(Command::Send(ClientMessage::PlayRound)),
        ["bid", value] => {
            let value: u8 = value.parse().map_err(|_| format!("无效的叫牌数: {}", value))?;
            let bid = Bid::new(value).map_err(|e| e.to_string())?;
            Ok(Command::Send(ClientMessage::SelectBid(bid.value())))
        }
        ["bid"] => Err("用法: bid <1-13>".to_string()),
        ["help"] => Ok(Command::Help),
        ["exit"] => Ok(Command::Exit),
        _ => Err(format!("未知命令: {}", line.trim())),
    }
}

fn print_help() {
    println!("--- Koz Maça Batak ---");
    println!("可用命令:");
    println!("  new                       - 重新发牌 (Yeniden Dağıt)");
    println!("  bid <1-13>                - 选择叫牌数");
    println!("  play                      - 打这一手 (Eli Oyna)");
    println!("  help                      - 显示帮助");
    println!("  exit                      - 退出");
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let server = args
        .next()
        .or_else(|| std::env::var("KOZ_MACA_SERVER").ok())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    let identifier = args.next().or_else(|| std::env::var("KOZ_MACA_IDENTIFIER").ok());
    let url = Url::parse(&server)?;

    println!("正在连接到: {}", url);
    let (ws_stream, _) = connect_async(url.as_str()).await?;
    println!("连接成功!");

    let (mut write, mut read) = ws_stream.split();

    // 所有发往服务器的消息都经过这个通道，读任务也要用它发送就绪信号
    let (tx, mut rx) = mpsc::unbounded_channel::<ClientMessage>();

    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let payload = match serde_json::to_string(&msg) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("序列化消息失败: {}", e);
                    continue;
                }
            };
            if let Err(e) = write.send(Message::Text(payload.into())).await {
                warn!("发送消息失败: {}", e);
                break;
            }
        }
    });

    // 处理从服务器接收的消息
    let ready_tx = tx.clone();
    tokio::spawn(async move {
        let mut handshake = HostHandshake::default();
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(&text) {
                    Ok(server_msg) => {
                        if let Some(rendered) = render_message(&server_msg, true) {
                            println!("\n{}\n", rendered);
                            prompt();
                        }
                        // 第一手牌已经显示，通知宿主
                        if matches!(server_msg, ServerMessage::SessionStarted { .. }) {
                            handshake.signal(&ready_tx);
                        }
                    }
                    Err(e) => eprintln!("解析服务器消息失败: {}", e),
                },
                Ok(_) => {}
                Err(e) => {
                    eprintln!("接收消息时出错: {}", e);
                    break;
                }
            }
        }
        if !handshake.attempted() {
            warn!("连接在第一手牌显示之前就关闭了");
        }
    });

    tx.send(ClientMessage::StartSession { identifier })?;
    print_help();

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt();
        let Some(line) = stdin.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Send(msg)) => {
                if tx.send(msg).is_err() {
                    eprintln!("与服务器的连接已断开");
                    break;
                }
            }
            Ok(Command::Help) => print_help(),
            Ok(Command::Exit) => {
                println!("正在断开连接...");
                break;
            }
            Err(message) => println!("{}", message),
        }
    }

    Ok(())
}
