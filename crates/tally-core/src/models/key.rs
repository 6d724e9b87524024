//! Natural key of a slot: the day of the week and the occasion.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Day of the week a slot falls on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monday" | "mon" => Ok(Day::Monday),
            "tuesday" | "tue" => Ok(Day::Tuesday),
            "wednesday" | "wed" => Ok(Day::Wednesday),
            "thursday" | "thu" => Ok(Day::Thursday),
            "friday" | "fri" => Ok(Day::Friday),
            "saturday" | "sat" => Ok(Day::Saturday),
            "sunday" | "sun" => Ok(Day::Sunday),
            _ => Err(format!("Invalid day: {s}")),
        }
    }
}

impl Day {
    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }
}

/// The occasion within a day that a slot decides.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Occasion {
    Breakfast,
    SecondBreakfast,
    Brunch,
    Lunch,
    Supper,
    Dinner,
}

impl FromStr for Occasion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(Occasion::Breakfast),
            "second_breakfast" | "second-breakfast" => Ok(Occasion::SecondBreakfast),
            "brunch" => Ok(Occasion::Brunch),
            "lunch" => Ok(Occasion::Lunch),
            "supper" => Ok(Occasion::Supper),
            "dinner" => Ok(Occasion::Dinner),
            _ => Err(format!("Invalid occasion: {s}")),
        }
    }
}

impl Occasion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Breakfast => "breakfast",
            Occasion::SecondBreakfast => "second_breakfast",
            Occasion::Brunch => "brunch",
            Occasion::Lunch => "lunch",
            Occasion::Supper => "supper",
            Occasion::Dinner => "dinner",
        }
    }
}

/// `(day, occasion)` pair identifying a slot within its plan. Options carry
/// the same key and compete for whichever slot shares it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub day: Day,
    pub occasion: Occasion,
}

impl SlotKey {
    pub fn new(day: Day, occasion: Occasion) -> Self {
        Self { day, occasion }
    }
}
