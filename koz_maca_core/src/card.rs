use crate::error::HandError;
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
// --- 核心数据结构定义 ---

/// 花色 (Suit)
/// 黑桃 (Spade) 固定为王牌花色
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Suit {
    Spade,   // Maça ♠
    Heart,   // Kupa ♥
    Diamond, // Karo ♦
    Club,    // Sinek ♣
}

/// 点数 (Rank)
/// 变体按牌面从大到小排列，与牌组和手牌的排序一致
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    King,
    Queen,
    Jack,
    Ten,
    Nine,
    Eight,
    Seven,
    Six,
    Five,
    Four,
    Three,
    Two,
}

/// 单张扑克牌 (Card)
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    /// 手牌显示顺序的排序键：先花色 (S,H,C,D)，再点数 (A..2)
    fn display_key(&self) -> (usize, usize) {
        (self.suit.display_index(), self.rank.index())
    }
}

impl Suit {
    /// 生成牌组时的花色顺序
    pub const DECK_ORDER: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

    /// 手牌显示时的花色顺序（红黑交替）
    pub const DISPLAY_ORDER: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Club, Suit::Diamond];

    /// 王牌花色
    pub const TRUMP: Suit = Suit::Spade;

    fn display_index(self) -> usize {
        match self {
            Suit::Spade => 0,
            Suit::Heart => 1,
            Suit::Club => 2,
            Suit::Diamond => 3,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spade => "\u{2660}",
            Suit::Heart => "\u{2665}",
            Suit::Diamond => "\u{2666}",
            Suit::Club => "\u{2663}",
        }
    }

    /// 土耳其语花色名称
    pub fn label(self) -> &'static str {
        match self {
            Suit::Spade => "Maça",
            Suit::Heart => "Kupa",
            Suit::Diamond => "Karo",
            Suit::Club => "Sinek",
        }
    }

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Heart | Suit::Diamond)
    }

    pub fn is_trump(self) -> bool {
        self == Suit::TRUMP
    }
}

impl Rank {
    /// A, K, Q, J, 10 .. 2
    pub const ORDER: [Rank; 13] = [
        Rank::Ace, Rank::King, Rank::Queen, Rank::Jack, Rank::Ten, Rank::Nine, Rank::Eight,
        Rank::Seven, Rank::Six, Rank::Five, Rank::Four, Rank::Three, Rank::Two,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn text(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::King => "K",
            Rank::Queen => "Q",
            Rank::Jack => "J",
            Rank::Ten => "10",
            Rank::Nine => "9",
            Rank::Eight => "8",
            Rank::Seven => "7",
            Rank::Six => "6",
            Rank::Five => "5",
            Rank::Four => "4",
            Rank::Three => "3",
            Rank::Two => "2",
        }
    }
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.suit, self.rank)
    }
}

// --- 手牌 ---

/// 一手 13 张互不相同的牌，始终按显示顺序排好
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Card>", into = "Vec<Card>")]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub const SIZE: usize = 13;

    /// 校验张数与唯一性，然后按显示顺序排序
    pub fn new(mut cards: Vec<Card>) -> Result<Hand, HandError> {
        if cards.len() != Self::SIZE {
            return Err(HandError::WrongSize(cards.len()));
        }
        let mut seen = HashSet::with_capacity(Self::SIZE);
        for card in &cards {
            if !seen.insert(*card) {
                return Err(HandError::DuplicateCard(*card));
            }
        }
        sort_hand(&mut cards);
        Ok(Hand { cards })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// 某一花色的牌（已按点数排序）
    pub fn suit_cards(&self, suit: Suit) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(move |c| c.suit == suit)
    }

    pub fn trump_count(&self) -> usize {
        self.suit_cards(Suit::TRUMP).count()
    }
}

impl TryFrom<Vec<Card>> for Hand {
    type Error = HandError;

    fn try_from(cards: Vec<Card>) -> Result<Self, Self::Error> {
        Hand::new(cards)
    }
}

impl From<Hand> for Vec<Card> {
    fn from(hand: Hand) -> Self {
        hand.cards
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}

// --- 随机牌组生成 ---

/// 创建一副完整的 52 张扑克牌，顺序固定：S,H,D,C，每个花色内 A..2
pub fn create_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);
    for &suit in &Suit::DECK_ORDER {
        for &rank in &Rank::ORDER {
            deck.push(Card { rank, suit });
        }
    }
    deck
}

/// Fisher–Yates 洗牌，返回新的序列，不修改输入
///
/// 从最后一个下标向下到 1，取 `j = floor(r * (i + 1))` 并交换 i 与 j，
/// 共 `len - 1` 步。随机源越界的取值会被截到 `i`。
pub fn shuffle<T: Clone, R: RandomSource + ?Sized>(items: &[T], source: &mut R) -> Vec<T> {
    let mut copy = items.to_vec();
    for i in (1..copy.len()).rev() {
        let r = source.next_f64();
        let j = ((r * (i + 1) as f64).floor().max(0.0) as usize).min(i);
        copy.swap(i, j);
    }
    copy
}

/// 按显示顺序原地排序
pub fn sort_hand(cards: &mut [Card]) {
    cards.sort_by_key(Card::display_key);
}

/// 用给定的随机源洗一副新牌，取前 13 张并排序
pub fn deal_hand<R: RandomSource + ?Sized>(source: &mut R) -> Hand {
    let deck = shuffle(&create_deck(), source);
    let mut cards = deck[..Hand::SIZE].to_vec();
    sort_hand(&mut cards);
    Hand { cards }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{PlatformRandom, SeededRandom};
    use Rank::*;
    use Suit::*;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    #[test]
    fn deck_has_52_unique_cards_in_canonical_order() {
        let deck = create_deck();
        assert_eq!(deck.len(), 52);
        let unique: HashSet<_> = deck.iter().copied().collect();
        assert_eq!(unique.len(), 52);

        assert_eq!(deck[0], card(Ace, Spade));
        assert_eq!(deck[12], card(Two, Spade));
        assert_eq!(deck[13], card(Ace, Heart));
        assert_eq!(deck[26], card(Ace, Diamond));
        assert_eq!(deck[51], card(Two, Club));
    }

    #[test]
    fn shuffle_keeps_the_same_cards_and_leaves_input_alone() {
        let deck = create_deck();
        let mut source = SeededRandom::new(42);
        let shuffled = shuffle(&deck, &mut source);

        assert_eq!(deck, create_deck());
        assert_eq!(shuffled.len(), 52);
        let before: HashSet<_> = deck.iter().copied().collect();
        let after: HashSet<_> = shuffled.iter().copied().collect();
        assert_eq!(before, after);
        assert_ne!(shuffled, deck);
    }

    #[test]
    fn shuffle_draws_exactly_len_minus_one_times() {
        let mut draws = 0;
        let mut counting = || {
            draws += 1;
            0.5
        };
        shuffle(&create_deck(), &mut counting);
        assert_eq!(draws, 51);
    }

    #[test]
    fn shuffle_with_zero_source_rotates_first_element_to_the_end() {
        // r = 0 时每一步都与下标 0 交换
        let mut zero = || 0.0;
        let shuffled = shuffle(&[1, 2, 3, 4], &mut zero);
        assert_eq!(shuffled, vec![2, 3, 4, 1]);
    }

    #[test]
    fn shuffle_clamps_out_of_range_draws() {
        let mut broken = || 1.0;
        let shuffled = shuffle(&[1, 2, 3], &mut broken);
        assert_eq!(shuffled, vec![1, 2, 3]);
    }

    #[test]
    fn shuffle_handles_empty_and_single() {
        let mut source = SeededRandom::new(7);
        assert!(shuffle::<u8, _>(&[], &mut source).is_empty());
        assert_eq!(shuffle(&[9], &mut source), vec![9]);
    }

    #[test]
    fn dealt_hand_has_13_unique_sorted_cards() {
        for seed in 1..50 {
            let hand = deal_hand(&mut SeededRandom::new(seed));
            let cards = hand.cards();
            assert_eq!(cards.len(), 13);
            let unique: HashSet<_> = cards.iter().copied().collect();
            assert_eq!(unique.len(), 13);
            assert!(cards.windows(2).all(|w| w[0].display_key() < w[1].display_key()));
        }
    }

    #[test]
    fn random_hand_is_valid() {
        let hand = deal_hand(&mut PlatformRandom::default());
        assert_eq!(Hand::new(hand.cards().to_vec()), Ok(hand));
    }

    #[test]
    fn sort_puts_spades_first_and_diamonds_last() {
        let mut cards = vec![
            card(Two, Diamond),
            card(King, Club),
            card(Three, Spade),
            card(Ace, Heart),
            card(Ace, Spade),
        ];
        sort_hand(&mut cards);
        assert_eq!(
            cards,
            vec![
                card(Ace, Spade),
                card(Three, Spade),
                card(Ace, Heart),
                card(King, Club),
                card(Two, Diamond),
            ]
        );
    }

    #[test]
    fn hand_rejects_wrong_size_and_duplicates() {
        let deck = create_deck();
        assert_eq!(Hand::new(deck[..12].to_vec()), Err(HandError::WrongSize(12)));

        let mut cards = deck[..12].to_vec();
        cards.push(deck[0]);
        assert_eq!(Hand::new(cards), Err(HandError::DuplicateCard(deck[0])));
    }

    #[test]
    fn hand_deserialization_validates() {
        let spades: Vec<Card> = Rank::ORDER.iter().map(|&r| card(r, Spade)).collect();
        let json = serde_json::to_string(&spades).unwrap();
        let hand: Hand = serde_json::from_str(&json).unwrap();
        assert_eq!(hand.trump_count(), 13);

        let short = serde_json::to_string(&spades[..3]).unwrap();
        assert!(serde_json::from_str::<Hand>(&short).is_err());
    }

    #[test]
    fn card_display_uses_symbol_and_rank_text() {
        assert_eq!(card(Ten, Heart).to_string(), "\u{2665}10");
        assert_eq!(card(Ace, Spade).to_string(), "\u{2660}A");
        assert_eq!(Diamond.label(), "Karo");
        assert!(Diamond.is_red());
        assert!(!Club.is_red());
    }
}
