//! Circular board of fields
//!
//! A board is laid out in construction order (start, tax block, chance block,
//! property block, empty filler) and then every position except index 0 is
//! shuffled uniformly.

use rand::{
    Rng,
    seq::{IndexedRandom, SliceRandom},
};

use crate::{
    Error, Result,
    board::{
        field::{Field, FieldKind, PropertyField},
        names::property_name,
    },
    config::SimulationConfig,
};

/// Ordered, fixed-size sequence of fields with the start field at index 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    fields: Vec<Field>,
}

impl Board {
    /// Build a new random layout from the configuration.
    ///
    /// Chance events are drawn (with replacement) now, not at landing time.
    ///
    /// # Errors
    ///
    /// Fails if the field counts do not fit the board or chance fields are
    /// requested without a chance catalog.
    pub fn generate<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Result<Self> {
        let non_start = config.tax_fields + config.chance_fields + config.property_fields;
        if config.board_size == 0 || non_start >= config.board_size {
            return Err(Error::invalid_config(format!(
                "{non_start} non-start fields do not fit on a board of size {}",
                config.board_size
            )));
        }

        let mut fields = Vec::with_capacity(config.board_size);
        fields.push(Field::Start);

        fields.extend((0..config.tax_fields).map(|_| Field::Tax {
            tax_amount: config.tax_amount,
        }));

        for _ in 0..config.chance_fields {
            let event = config
                .chance_events
                .choose(rng)
                .ok_or_else(|| Error::invalid_config("no chance events defined"))?;
            fields.push(Field::Chance(event.clone()));
        }

        fields.extend((0..config.property_fields).map(|index| {
            Field::Property(PropertyField::new(
                property_name(index),
                config.property_price,
                config.property_rent,
            ))
        }));

        fields.resize(config.board_size, Field::Empty);

        // Shuffle every field except the start field
        fields[1..].shuffle(rng);

        Ok(Self { fields })
    }

    /// Wrap an explicit layout.
    ///
    /// # Errors
    ///
    /// The layout must be non-empty and hold exactly one start field, at
    /// index 0.
    pub fn from_fields(fields: Vec<Field>) -> Result<Self> {
        let starts = fields
            .iter()
            .filter(|field| field.kind() == FieldKind::Start)
            .count();
        if fields.first() != Some(&Field::Start) || starts != 1 {
            return Err(Error::invalid_config(
                "a board needs exactly one start field, at index 0",
            ));
        }
        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Result<&Field> {
        let board_size = self.fields.len();
        self.fields
            .get(index)
            .ok_or(Error::FieldOutOfBounds { index, board_size })
    }

    pub fn field_mut(&mut self, index: usize) -> Result<&mut Field> {
        let board_size = self.fields.len();
        self.fields
            .get_mut(index)
            .ok_or(Error::FieldOutOfBounds { index, board_size })
    }

    /// Replace the field at `index`.
    ///
    /// # Errors
    ///
    /// Out-of-range indices fail with [`Error::FieldOutOfBounds`]; moving,
    /// removing or duplicating the start field is rejected.
    pub fn set_field(&mut self, index: usize, field: Field) -> Result<()> {
        let slot = self.field_mut(index)?;
        let keeps_start = (index == 0) == (field.kind() == FieldKind::Start);
        if !keeps_start {
            return Err(Error::invalid_config(
                "the start field must stay at index 0",
            ));
        }
        *slot = field;
        Ok(())
    }

    /// Number of fields of the given kind
    pub fn count(&self, kind: FieldKind) -> usize {
        self.fields.iter().filter(|field| field.kind() == kind).count()
    }

    /// Properties with their positions
    pub fn properties(&self) -> impl Iterator<Item = (usize, &PropertyField)> {
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(index, field)| field.as_property().map(|property| (index, property)))
    }

    pub fn owned_properties(&self) -> impl Iterator<Item = (usize, &PropertyField)> {
        self.properties().filter(|(_, property)| property.is_owned())
    }
}
