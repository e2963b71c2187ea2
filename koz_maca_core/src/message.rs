use crate::card::Hand;
use crate::logic::{Bid, RoundResult};
use crate::state::{GameState, SessionId};
use serde::{Deserialize, Serialize};

// --- 客户端 -> 服务器 的消息 ---
// 对应界面上的几个操作：重新发牌、选择叫牌数、打这一手，以及宿主的就绪握手。

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// 开始一个会话。标识符决定第一手牌，缺省时用服务器生成的会话 ID
    StartSession { identifier: Option<String> },
    /// 重新发牌（非种子随机），清除结果并把叫牌重置为 5
    NewHand,
    /// 选择叫牌数，只接受 1..=13
    SelectBid(u8),
    /// 打这一手，得到结算结果
    PlayRound,
    /// 首次渲染完成后通知宿主内容已可见，每个会话只发一次
    Ready,
}

// --- 服务器 -> 客户端 的消息 ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// 会话已创建，附带完整的初始状态
    SessionStarted {
        session_id: SessionId,
        game_state: GameState,
    },

    /// 发了一手新牌
    HandDealt { hand: Hand },

    /// 当前叫牌数
    BidSelected { bid: Bid },

    /// 回合结算
    RoundPlayed(RoundResult),

    /// 就绪信号已收到
    ReadyAcknowledged,

    Info { message: String },
    Error { message: String },
}
