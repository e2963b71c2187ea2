use crate::card::{deal_hand, Hand};
use crate::error::BidError;
use crate::logic::{evaluate_round, Bid, RoundResult};
use crate::message::{ClientMessage, ServerMessage};
use crate::rng::{PlatformRandom, RandomSource, SeededRandom};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SessionId = Uuid;

/// 会话已经存在时再次收到 `StartSession` 的回复
pub const ALREADY_STARTED: &str = "会话已经开始";

/// 单个玩家会话的全部状态
///
/// 手牌、叫牌和结果都只属于这一个会话，每次变化整体替换，不做局部修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub session_id: SessionId,
    /// 生成第一手牌所用的标识符
    pub identifier: String,
    pub hand: Hand,
    pub bid: Bid,
    pub result: Option<RoundResult>,
    /// 宿主是否已收到就绪信号
    pub host_ready: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// 还没有结果，可以选叫牌
    Bidding,
    /// 结果已显示，等待重新发牌
    ResultShown,
}

// --- GameState 的实现方法 ---

impl GameState {
    /// 创建会话：第一手牌由标识符决定，同一个标识符总是得到同一手牌
    pub fn new(session_id: SessionId, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let hand = deal_hand(&mut SeededRandom::from_identifier(&identifier));
        GameState {
            session_id,
            identifier,
            hand,
            bid: Bid::default(),
            result: None,
            host_ready: false,
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.result.is_some() {
            GamePhase::ResultShown
        } else {
            GamePhase::Bidding
        }
    }

    /// 重新发牌：新手牌、清除结果、叫牌回到 5
    pub fn new_hand<R: RandomSource + ?Sized>(&mut self, source: &mut R) {
        self.hand = deal_hand(source);
        self.result = None;
        self.bid = Bid::default();
    }

    /// 非法的叫牌数不会改变状态
    pub fn select_bid(&mut self, value: u8) -> Result<Bid, BidError> {
        let bid = Bid::new(value)?;
        self.bid = bid;
        Ok(bid)
    }

    /// 结算当前手牌与叫牌，结果会覆盖上一次的
    pub fn play_round(&mut self) -> RoundResult {
        let result = evaluate_round(&self.hand, self.bid);
        self.result = Some(result);
        result
    }

    /// 记录就绪握手。返回 `false` 表示之前已经记录过
    pub fn mark_ready(&mut self) -> bool {
        !std::mem::replace(&mut self.host_ready, true)
    }

    /// 处理一条客户端消息，返回需要回给客户端的消息
    pub fn handle_message(&mut self, msg: ClientMessage) -> Vec<ServerMessage> {
        self.handle_message_with(msg, &mut PlatformRandom::default())
    }

    /// 同 [`GameState::handle_message`]，但重新发牌时使用指定的随机源
    pub fn handle_message_with<R: RandomSource + ?Sized>(
        &mut self,
        msg: ClientMessage,
        source: &mut R,
    ) -> Vec<ServerMessage> {
        match msg {
            ClientMessage::StartSession { .. } => {
                vec![ServerMessage::Error { message: ALREADY_STARTED.to_string() }]
            }
            ClientMessage::NewHand => {
                self.new_hand(source);
                vec![
                    ServerMessage::HandDealt { hand: self.hand.clone() },
                    ServerMessage::BidSelected { bid: self.bid },
                ]
            }
            ClientMessage::SelectBid(value) => match self.select_bid(value) {
                Ok(bid) => vec![ServerMessage::BidSelected { bid }],
                Err(e) => vec![ServerMessage::Error { message: e.to_string() }],
            },
            ClientMessage::PlayRound => vec![ServerMessage::RoundPlayed(self.play_round())],
            ClientMessage::Ready => {
                if self.mark_ready() {
                    vec![ServerMessage::ReadyAcknowledged]
                } else {
                    vec![ServerMessage::Info { message: "已经收到过就绪信号".to_string() }]
                }
            }
        }
    }
}
