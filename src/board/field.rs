//! Board fields

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ChanceEvent;

/// Explicit tag of a [`Field`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldKind {
    Start,
    Tax,
    Chance,
    Property,
    /// Filler for positions not covered by the configured field counts
    Empty,
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Start => "Start",
            FieldKind::Tax => "Tax",
            FieldKind::Chance => "Chance",
            FieldKind::Property => "Property",
            FieldKind::Empty => "Empty",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A purchasable property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyField {
    pub name: String,
    pub price: i64,
    pub rent: i64,
    is_owned: bool,
}

impl PropertyField {
    pub fn new(name: impl Into<String>, price: i64, rent: i64) -> Self {
        Self {
            name: name.into(),
            price,
            rent,
            is_owned: false,
        }
    }

    pub fn is_owned(&self) -> bool {
        self.is_owned
    }

    /// Flip to owned. Returns `false` if it already was.
    pub fn mark_owned(&mut self) -> bool {
        !std::mem::replace(&mut self.is_owned, true)
    }
}

/// Behavior descriptor of one board position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Field {
    Start,
    Tax { tax_amount: i64 },
    Chance(ChanceEvent),
    Property(PropertyField),
    Empty,
}

impl Field {
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Start => FieldKind::Start,
            Field::Tax { .. } => FieldKind::Tax,
            Field::Chance(_) => FieldKind::Chance,
            Field::Property(_) => FieldKind::Property,
            Field::Empty => FieldKind::Empty,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyField> {
        match self {
            Field::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_property_mut(&mut self) -> Option<&mut PropertyField> {
        match self {
            Field::Property(property) => Some(property),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Property(property) => write!(f, "Property '{}'", property.name),
            Field::Chance(event) => write!(f, "Chance ({})", event.description),
            other => f.write_str(other.kind().label()),
        }
    }
}
