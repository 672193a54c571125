//! Procedures offered by a hospital.

use crate::ids::DenseId;
use hsm_types::NonEmptyText;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A medical procedure owned by exactly one hospital.
///
/// The `id` is dense within the owning hospital and is assigned when the procedure is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    id: usize,
    name: NonEmptyText,
    description: NonEmptyText,
    is_elective: bool,
    cost: f64,
}

impl Procedure {
    /// Creates a procedure that has not yet been added to a hospital.
    ///
    /// `cost` is expected to be non-negative; front ends check this with
    /// [`crate::validation::non_negative_amount`].
    pub fn new(
        name: NonEmptyText,
        description: NonEmptyText,
        is_elective: bool,
        cost: f64,
    ) -> Self {
        Self {
            id: 0,
            name,
            description,
            is_elective,
            cost,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &NonEmptyText {
        &self.name
    }

    pub fn set_name(&mut self, name: NonEmptyText) {
        self.name = name;
    }

    pub fn description(&self) -> &NonEmptyText {
        &self.description
    }

    pub fn set_description(&mut self, description: NonEmptyText) {
        self.description = description;
    }

    pub fn is_elective(&self) -> bool {
        self.is_elective
    }

    pub fn set_elective(&mut self, is_elective: bool) {
        self.is_elective = is_elective;
    }

    /// Listed cost. Only public patients are ever billed this amount.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn set_cost(&mut self, cost: f64) {
        self.cost = cost;
    }
}

impl DenseId for Procedure {
    fn dense_id(&self) -> usize {
        self.id
    }

    fn set_dense_id(&mut self, id: usize) {
        self.id = id;
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Description: {}, Elective: {}, Cost: ${}",
            self.id, self.name, self.description, self.is_elective, self.cost
        )
    }
}
