//! # Koz Maça 核心逻辑库
//!
//! 这个 `core` crate 包含了 Koz Maça（黑桃为王牌的叫牌小游戏）的全部核心逻辑：
//! 牌组生成、洗牌、可复现的种子随机数、发牌、赢墩估算、回合结算，
//! 以及会话状态机和客户端-服务器通信消息的定义。
//! 它不依赖任何网络或界面实现，服务器和终端客户端都复用这里的类型。

mod card;
mod error;
mod logic;
mod message;
mod rng;
mod state;

pub use card::*;

pub use error::*;

pub use logic::*;

pub use message::*;

pub use rng::*;

pub use state::*;
