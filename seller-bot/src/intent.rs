use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Entity name the classifier uses for a part id
pub const PART_ID_ENTITY: &str = "PId";

/// User goals the classifier can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Search,
    StartSearch,
    AddCart,
    RemoveCart,
    Shop,
    GetQuote,
    RequestQuote,
    Greetings,
    Help,
    Login,
    None,
}

impl Intent {
    /// Map a classifier label to an intent; anything unrecognised is `None`
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Search" => Intent::Search,
            "StartSearch" => Intent::StartSearch,
            "AddCart" => Intent::AddCart,
            "RemoveCart" => Intent::RemoveCart,
            "Shop" => Intent::Shop,
            "GetQuote" => Intent::GetQuote,
            "RequestQuote" => Intent::RequestQuote,
            "Greetings" => Intent::Greetings,
            "Help" => Intent::Help,
            "Login" => Intent::Login,
            _ => Intent::None,
        }
    }
}

/// Classifier output for one utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition {
    pub intent: Intent,
    pub entities: HashMap<String, Vec<String>>,
}

impl Recognition {
    pub fn new(intent: Intent, entities: HashMap<String, Vec<String>>) -> Self {
        Self { intent, entities }
    }

    pub fn intent(intent: Intent) -> Self {
        Self::new(intent, HashMap::new())
    }

    pub fn with_entity(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entities
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// First value the classifier extracted for the entity
    pub fn entity(&self, name: &str) -> Option<&str> {
        self.entities
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
