use serde::{Deserialize, Serialize};

/// One of the two playing teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    /// The opposing team
    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// The card type that belongs to this team
    pub fn card_type(self) -> CardType {
        match self {
            Team::Red => CardType::Red,
            Team::Blue => CardType::Blue,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::Red => write!(f, "RED"),
            Team::Blue => write!(f, "BLUE"),
        }
    }
}

/// Identity of a card on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardType {
    Red,
    Blue,
    Neutral,
    Assassin,
}

impl CardType {
    /// Whether this card belongs to the given team
    pub fn is_team(self, team: Team) -> bool {
        self == team.card_type()
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardType::Red => write!(f, "RED"),
            CardType::Blue => write!(f, "BLUE"),
            CardType::Neutral => write!(f, "NEUTRAL"),
            CardType::Assassin => write!(f, "ASSASSIN"),
        }
    }
}
