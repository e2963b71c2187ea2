use crate::card::*;
use crate::error::BidError;
use serde::{Deserialize, Serialize};
use std::fmt;

// --- 赢墩估算 ---

/// 每个点数的基础分，以 0.1 为单位存成整数，求和时没有浮点误差
const RANK_WEIGHTS: [(Rank, u32); 13] = [
    (Rank::Ace, 14),
    (Rank::King, 12),
    (Rank::Queen, 9),
    (Rank::Jack, 7),
    (Rank::Ten, 6),
    (Rank::Nine, 4),
    (Rank::Eight, 3),
    (Rank::Seven, 2),
    (Rank::Six, 2),
    (Rank::Five, 1),
    (Rank::Four, 1),
    (Rank::Three, 1),
    (Rank::Two, 1),
];

/// 查表失败时的基础分
const DEFAULT_RANK_WEIGHT: u32 = 1;
/// 每张王牌的固定加分
const TRUMP_BONUS: u32 = 6;
/// 王牌 A / K 的额外加分
const TRUMP_HONOR_BONUS: u32 = 5;

/// 估算结果的上限，一手牌最多 13 墩
pub const MAX_TRICKS: u8 = 13;

fn rank_weight(rank: Rank) -> u32 {
    RANK_WEIGHTS
        .iter()
        .find(|(r, _)| *r == rank)
        .map_or(DEFAULT_RANK_WEIGHT, |(_, w)| *w)
}

/// 单张牌的得分（0.1 为单位）
pub fn card_score_tenths(card: &Card) -> u32 {
    let mut score = rank_weight(card.rank);
    if card.suit.is_trump() {
        score += TRUMP_BONUS;
        if matches!(card.rank, Rank::Ace | Rank::King) {
            score += TRUMP_HONOR_BONUS;
        }
    }
    score
}

/// 用启发式分数估算一手牌能拿到的墩数
///
/// 总分除以 2 后四舍五入（.5 向上），再截到 `[0, 13]`。
/// 这只是近似值，并不真的模拟出牌；结果与牌的顺序无关。
pub fn estimate_tricks(cards: &[Card]) -> u8 {
    let total: u32 = cards.iter().map(card_score_tenths).sum();
    // total / 10 / 2，四舍五入
    let estimate = (total + 10) / 20;
    estimate.min(u32::from(MAX_TRICKS)) as u8
}

// --- 叫牌与结算 ---

/// 玩家叫的墩数，范围 1..=13
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Bid(u8);

impl Bid {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 13;
    pub const DEFAULT: Bid = Bid(5);

    pub fn new(value: u8) -> Result<Bid, BidError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Bid(value))
        } else {
            Err(BidError::OutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// 所有可选的叫牌数，供界面列出
    pub fn options() -> impl Iterator<Item = Bid> {
        (Self::MIN..=Self::MAX).map(Bid)
    }
}

impl Default for Bid {
    fn default() -> Self {
        Bid::DEFAULT
    }
}

impl TryFrom<u8> for Bid {
    type Error = BidError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Bid::new(value)
    }
}

impl From<Bid> for u8 {
    fn from(bid: Bid) -> Self {
        bid.0
    }
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 叫牌成败的三种情况
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// 拿到的墩数不少于叫牌，且最多多 2 墩
    Made,
    /// 少于叫牌
    FellShort,
    /// 比叫牌多 3 墩或以上
    Overshot,
}

/// 一回合的结算结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub actual: u8,
    pub bid: Bid,
    pub success: bool,
    /// actual - bid
    pub difference: i8,
}

/// 允许超出叫牌的最大墩数（庄规）
pub const OVERSHOOT_ALLOWANCE: i8 = 2;

impl RoundResult {
    pub fn outcome(&self) -> RoundOutcome {
        if self.success {
            RoundOutcome::Made
        } else if self.difference < 0 {
            RoundOutcome::FellShort
        } else {
            RoundOutcome::Overshot
        }
    }
}

/// 比较叫牌与估算结果
pub fn evaluate_round(hand: &Hand, bid: Bid) -> RoundResult {
    let actual = estimate_tricks(hand.cards());
    let difference = actual as i8 - bid.value() as i8;
    let success = (0..=OVERSHOOT_ALLOWANCE).contains(&difference);
    RoundResult { actual, bid, success, difference }
}

// --- 单元测试 ---
