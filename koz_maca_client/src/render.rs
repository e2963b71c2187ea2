//! 把服务器消息渲染成终端文本。

use crossterm::style::{Color, Stylize};
use koz_maca_core::{Bid, Card, Hand, RoundOutcome, RoundResult, ServerMessage, Suit};

/// 黑桃、梅花用黑色（终端里显示为白色），红心、方块用红色
fn suit_color(suit: Suit) -> Color {
    if suit.is_red() { Color::Red } else { Color::White }
}

fn render_card(card: &Card, colored: bool) -> String {
    if colored {
        card.to_string().with(suit_color(card.suit)).to_string()
    } else {
        card.to_string()
    }
}

/// 按花色分行显示手牌，每行以花色名称开头
pub fn render_hand(hand: &Hand, colored: bool) -> String {
    let mut lines = Vec::new();
    for suit in Suit::DISPLAY_ORDER {
        let cards: Vec<String> = hand.suit_cards(suit).map(|c| render_card(c, colored)).collect();
        if cards.is_empty() {
            continue;
        }
        lines.push(format!("{:<6} {}", suit.label(), cards.join(" ")));
    }
    lines.join("\n")
}

/// 王牌（黑桃）张数，显示在手牌下方
pub fn render_trump_count(hand: &Hand) -> String {
    format!("Koz ({}): {}", Suit::TRUMP.symbol(), hand.trump_count())
}

/// 列出 1..=13，当前叫牌用方括号标出
pub fn render_bid_options(selected: Bid) -> String {
    Bid::options()
        .map(|bid| if bid == selected { format!("[{}]", bid) } else { bid.to_string() })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn outcome_message(outcome: RoundOutcome) -> &'static str {
    match outcome {
        RoundOutcome::Made => "Tahminin tuttu, bu eli kurtardın!",
        RoundOutcome::FellShort => "Tahmininin altında kaldın, maalesef battın.",
        RoundOutcome::Overshot => "Tahmininden 3 ya da daha fazla aldın, maalesef battın.",
    }
}

pub fn render_result(result: &RoundResult) -> String {
    format!(
        "Sonuç: Tahminin {} eldi, {} el aldın.\n{}",
        result.bid,
        result.actual,
        outcome_message(result.outcome())
    )
}

/// 渲染一条服务器消息；不需要显示的消息返回 `None`
pub fn render_message(msg: &ServerMessage, colored: bool) -> Option<String> {
    match msg {
        ServerMessage::SessionStarted { session_id, game_state } => Some(format!(
            "会话 {}\n{}\n{}\nKaç el alabileceğini seç: {}",
            session_id,
            render_hand(&game_state.hand, colored),
            render_trump_count(&game_state.hand),
            render_bid_options(game_state.bid)
        )),
        ServerMessage::HandDealt { hand } => Some(format!(
            "Yeni el:\n{}\n{}",
            render_hand(hand, colored),
            render_trump_count(hand)
        )),
        ServerMessage::BidSelected { bid } => Some(format!("Tahmin: {}", render_bid_options(*bid))),
        ServerMessage::RoundPlayed(result) => Some(render_result(result)),
        ServerMessage::ReadyAcknowledged => None,
        ServerMessage::Info { message } => Some(format!("[信息] {}", message)),
        ServerMessage::Error { message } => Some(format!("[错误] {}", message)),
    }
}
