//! Scenario and topic catalog.
//!
//! Static nested mapping from location x difficulty tier to the scenario
//! text and the topics a conversation at that location can be about.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::registry::DifficultyTier;

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// A place in the simulated town. Each location hosts one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Cafe,
    Market,
    Library,
    Park,
    TrainStation,
}

/// Every location in town. Tier advancement requires all of them.
pub const ALL_LOCATIONS: [Location; 5] = [
    Location::Cafe,
    Location::Market,
    Location::Library,
    Location::Park,
    Location::TrainStation,
];

impl Location {
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Cafe => "cafe",
            Location::Market => "market",
            Location::Library => "library",
            Location::Park => "park",
            Location::TrainStation => "train_station",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Location::Cafe => "Café",
            Location::Market => "Market",
            Location::Library => "Library",
            Location::Park => "Park",
            Location::TrainStation => "Train Station",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ALL_LOCATIONS
            .into_iter()
            .find(|loc| loc.as_str() == normalized)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Location",
                key: s.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Characters
// ---------------------------------------------------------------------------

/// The AI-driven resident the learner talks to at a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Character {
    pub name: &'static str,
    pub role: &'static str,
    pub personality: &'static str,
}

pub fn character_for(location: Location) -> Character {
    match location {
        Location::Cafe => Character {
            name: "Marco",
            role: "barista",
            personality: "cheerful and chatty, loves recommending drinks",
        },
        Location::Market => Character {
            name: "Rosa",
            role: "fruit and vegetable vendor",
            personality: "warm, a little bit of a haggler, proud of her produce",
        },
        Location::Library => Character {
            name: "Elena",
            role: "librarian",
            personality: "calm, patient and quietly enthusiastic about books",
        },
        Location::Park => Character {
            name: "Tom",
            role: "retired postman walking his dog",
            personality: "friendly, curious and fond of small talk",
        },
        Location::TrainStation => Character {
            name: "Yuki",
            role: "ticket office clerk",
            personality: "polite, efficient and helpful with directions",
        },
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

/// Scenario text for a known location at a given tier.
pub fn scenario(location: Location, tier: DifficultyTier) -> &'static str {
    use DifficultyTier::*;
    use Location::*;

    match (location, tier) {
        (Cafe, Beginner) => "The learner is ordering a drink and a snack at the counter.",
        (Cafe, Intermediate) => {
            "The learner is a regular customer chatting about their day while their order is prepared."
        }
        (Cafe, Advanced) => {
            "The learner is discussing the café's new seasonal menu and giving detailed feedback."
        }
        (Market, Beginner) => "The learner is buying fruit and asking about prices.",
        (Market, Intermediate) => {
            "The learner is comparing produce, asking where it comes from and negotiating quantities."
        }
        (Market, Advanced) => {
            "The learner is planning a dinner party and discussing recipes and seasonal ingredients."
        }
        (Library, Beginner) => "The learner wants to borrow a book and needs a library card.",
        (Library, Intermediate) => {
            "The learner is looking for recommendations and asking about library events."
        }
        (Library, Advanced) => {
            "The learner is discussing a novel they recently finished and its themes."
        }
        (Park, Beginner) => "The learner meets a friendly local on a bench and says hello.",
        (Park, Intermediate) => {
            "The learner is chatting about weekend plans, hobbies and the weather."
        }
        (Park, Advanced) => {
            "The learner is debating how the town could improve its green spaces."
        }
        (TrainStation, Beginner) => "The learner is buying a ticket to the next town.",
        (TrainStation, Intermediate) => {
            "The learner's train is delayed and they need to change their travel plans."
        }
        (TrainStation, Advanced) => {
            "The learner is resolving a complicated booking problem involving a missed connection."
        }
    }
}

/// Difficulty-keyed sentence used when the location is not recognised.
pub fn generic_scenario(tier: DifficultyTier) -> &'static str {
    match tier {
        DifficultyTier::Beginner => {
            "The learner is having a simple, friendly everyday conversation."
        }
        DifficultyTier::Intermediate => {
            "The learner is having a casual conversation about daily life and plans."
        }
        DifficultyTier::Advanced => {
            "The learner is having an in-depth conversation sharing opinions and experiences."
        }
    }
}

/// Scenario lookup by location name, falling back to the generic sentence
/// for unknown names.
pub fn scenario_for_name(location: &str, tier: DifficultyTier) -> &'static str {
    match location.parse::<Location>() {
        Ok(loc) => scenario(loc, tier),
        Err(_) => generic_scenario(tier),
    }
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

/// A practice scenario unit. `id` is unique within its (location, tier) bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

const fn topic(id: &'static str, name: &'static str, description: &'static str) -> Topic {
    Topic {
        id,
        name,
        description,
    }
}

const CAFE_BEGINNER: &[Topic] = &[
    topic("order_coffee", "Ordering coffee", "Order a hot drink and choose a size."),
    topic("pastry_choice", "Choosing a pastry", "Ask what pastries are available and pick one."),
    topic("paying_bill", "Paying the bill", "Ask for the price and pay by card or cash."),
];

const CAFE_INTERMEDIATE: &[Topic] = &[
    topic("usual_order", "Your usual order", "Explain how you like your drink and why."),
    topic("weekend_recap", "Weekend recap", "Tell the barista what you did last weekend."),
    topic("cafe_work", "Working from the café", "Ask about wifi, outlets and quiet tables."),
];

const CAFE_ADVANCED: &[Topic] = &[
    topic("menu_feedback", "Menu feedback", "Give detailed feedback on a new seasonal drink."),
    topic("coffee_origins", "Coffee origins", "Discuss where beans come from and fair trade."),
    topic("opening_cafe", "Opening a café", "Talk about the challenges of running a small business."),
];

const MARKET_BEGINNER: &[Topic] = &[
    topic("buy_fruit", "Buying fruit", "Ask for a kilo of apples and a few bananas."),
    topic("ask_price", "Asking prices", "Find out how much different vegetables cost."),
    topic("count_change", "Counting change", "Pay and check that your change is correct."),
];

const MARKET_INTERMEDIATE: &[Topic] = &[
    topic("produce_origin", "Where it comes from", "Ask where the produce was grown."),
    topic("bulk_discount", "Bulk discount", "Negotiate a better price for a larger order."),
    topic("ripeness", "Picking ripe produce", "Ask how to tell when fruit is ripe."),
];

const MARKET_ADVANCED: &[Topic] = &[
    topic("dinner_party", "Dinner party plans", "Plan a menu for guests with dietary needs."),
    topic("seasonal_eating", "Seasonal eating", "Discuss the benefits of buying seasonal food."),
    topic("local_farming", "Local farming", "Talk about challenges facing local farmers."),
];

const LIBRARY_BEGINNER: &[Topic] = &[
    topic("library_card", "Getting a card", "Sign up for a library card."),
    topic("borrow_book", "Borrowing a book", "Ask how long you can keep a book."),
    topic("find_section", "Finding a section", "Ask where the children's books are."),
];

const LIBRARY_INTERMEDIATE: &[Topic] = &[
    topic("recommendations", "Book recommendations", "Ask for a book similar to one you enjoyed."),
    topic("library_events", "Library events", "Find out about the reading club schedule."),
    topic("late_return", "Late return", "Explain why a book is overdue."),
];

const LIBRARY_ADVANCED: &[Topic] = &[
    topic("novel_themes", "Discussing themes", "Discuss the themes of a novel you finished."),
    topic("digital_reading", "Paper or screen", "Debate e-books versus printed books."),
    topic("research_help", "Research help", "Ask for help finding sources for a project."),
];

const PARK_BEGINNER: &[Topic] = &[
    topic("greetings", "Saying hello", "Introduce yourself and ask the other person's name."),
    topic("the_dog", "The dog", "Ask about the dog's name and age."),
    topic("weather_today", "Today's weather", "Talk about the weather today."),
];

const PARK_INTERMEDIATE: &[Topic] = &[
    topic("weekend_plans", "Weekend plans", "Share what you are doing this weekend."),
    topic("hobbies", "Hobbies", "Talk about what you like to do in your free time."),
    topic("neighbourhood", "The neighbourhood", "Ask for tips about the area."),
];

const PARK_ADVANCED: &[Topic] = &[
    topic("green_spaces", "Green spaces", "Debate how the town should improve its parks."),
    topic("childhood_memories", "Childhood memories", "Compare how childhood has changed over time."),
    topic("community_project", "Community project", "Propose a volunteer project for the park."),
];

const STATION_BEGINNER: &[Topic] = &[
    topic("buy_ticket", "Buying a ticket", "Buy a one-way ticket to the next town."),
    topic("platform", "Which platform", "Ask which platform your train leaves from."),
    topic("timetable", "Departure times", "Ask when the next train leaves."),
];

const STATION_INTERMEDIATE: &[Topic] = &[
    topic("delayed_train", "Delayed train", "Rearrange your plans after a delay."),
    topic("return_trip", "Return trip", "Book a return ticket with a seat reservation."),
    topic("lost_item", "Lost property", "Report something you left on the train."),
];

const STATION_ADVANCED: &[Topic] = &[
    topic("missed_connection", "Missed connection", "Resolve a booking after missing a connection."),
    topic("refund_claim", "Refund claim", "Argue for a refund after a cancellation."),
    topic("rail_travel", "Rail versus flying", "Discuss the pros and cons of travelling by train."),
];

/// Topics defined for a (location, tier) bucket.
pub fn topics(location: Location, tier: DifficultyTier) -> &'static [Topic] {
    use DifficultyTier::*;
    use Location::*;

    match (location, tier) {
        (Cafe, Beginner) => CAFE_BEGINNER,
        (Cafe, Intermediate) => CAFE_INTERMEDIATE,
        (Cafe, Advanced) => CAFE_ADVANCED,
        (Market, Beginner) => MARKET_BEGINNER,
        (Market, Intermediate) => MARKET_INTERMEDIATE,
        (Market, Advanced) => MARKET_ADVANCED,
        (Library, Beginner) => LIBRARY_BEGINNER,
        (Library, Intermediate) => LIBRARY_INTERMEDIATE,
        (Library, Advanced) => LIBRARY_ADVANCED,
        (Park, Beginner) => PARK_BEGINNER,
        (Park, Intermediate) => PARK_INTERMEDIATE,
        (Park, Advanced) => PARK_ADVANCED,
        (TrainStation, Beginner) => STATION_BEGINNER,
        (TrainStation, Intermediate) => STATION_INTERMEDIATE,
        (TrainStation, Advanced) => STATION_ADVANCED,
    }
}

/// Look up a topic by id within its bucket.
pub fn find_topic(location: Location, tier: DifficultyTier, id: &str) -> Option<&'static Topic> {
    topics(location, tier).iter().find(|t| t.id == id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
