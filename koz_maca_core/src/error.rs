//! 核心逻辑的错误类型。

use crate::card::Card;
use thiserror::Error;

/// 构造手牌时可能出现的错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandError {
    /// 张数不是 13
    #[error("a hand holds exactly 13 cards, got {0}")]
    WrongSize(usize),
    /// 同一张牌出现了两次
    #[error("duplicate card {0} in hand")]
    DuplicateCard(Card),
}

/// 叫牌数不合法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BidError {
    #[error("bid must be between 1 and 13, got {0}")]
    OutOfRange(u8),
}
