//! Cards, hand arithmetic, and the dealer drawing policy.

use crate::rng::GameRng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

pub const SUITS: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

pub const RANKS: [Rank; 13] = [
    Rank::Ace,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
];

impl Rank {
    /// Face value with aces high (11); `hand_value` demotes aces as
    /// needed.
    pub fn value(self) -> u32 {
        match self {
            Rank::Ace => 11,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        };
        write!(f, "{label}")
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyph = match self {
            Suit::Spades => "\u{2660}",
            Suit::Hearts => "\u{2665}",
            Suit::Diamonds => "\u{2666}",
            Suit::Clubs => "\u{2663}",
        };
        write!(f, "{glyph}")
    }
}

/// One playing card. The suit is display-only; every rule works off the
/// rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// A full 52-card pile, shuffled. Cards are drawn from the back.
pub fn shuffled_pile(rng: &mut GameRng) -> Vec<Card> {
    let mut pile = Vec::with_capacity(52);
    for suit in SUITS {
        for rank in RANKS {
            pile.push(Card { rank, suit });
        }
    }
    rng.shuffle(&mut pile);
    pile
}

/// Hand total with aces first counted as 11, then demoted to 1 one at a
/// time while the total busts.
pub fn hand_value(hand: &[Card]) -> u32 {
    let mut value = 0;
    let mut aces = 0;
    for card in hand {
        value += card.rank.value();
        if card.rank == Rank::Ace {
            aces += 1;
        }
    }
    while value > 21 && aces > 0 {
        value -= 10;
        aces -= 1;
    }
    value
}

/// Two cards totaling 21, dealt at the start of a round.
pub fn is_natural(hand: &[Card]) -> bool {
    hand.len() == 2 && hand_value(hand) == 21
}

/// A total that still counts an ace as 11.
pub fn is_soft(hand: &[Card]) -> bool {
    let hard: u32 = hand
        .iter()
        .map(|card| match card.rank {
            Rank::Ace => 1,
            other => other.value(),
        })
        .sum();
    hand_value(hand) > hard
}

/// Dealer drawing policy: always draw under hard 17; on 17, draw only
/// when the 17 is soft and the house hits soft 17.
pub fn dealer_should_hit(hand: &[Card], hit_soft_17: bool) -> bool {
    let value = hand_value(hand);
    if value < 17 {
        return true;
    }
    value == 17 && hit_soft_17 && is_soft(hand)
}
