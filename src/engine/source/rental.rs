use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::engine::errors::{EngineError, ReferentialError, TypeError};
use crate::engine::schema::{Row, RowSchema};
use crate::engine::types::LogicalType;

/// One rental event.
#[derive(Debug, Clone, PartialEq)]
pub struct FactRow {
    pub rental_id: u64,
    pub customer_id: u64,
    pub movie_id: u64,
    /// 1..=10 when the customer rated the movie
    pub rating: Option<u8>,
    pub rental_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDim {
    pub customer_id: u64,
    pub country: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieDim {
    pub movie_id: u64,
    pub genre: Option<String>,
    pub year_of_release: Option<i64>,
    pub renting_price: f64,
}

/// How a rental with no matching dimension row is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinMode {
    /// Missing dimension rows are a `ReferentialError`
    #[default]
    Strict,
    /// Missing dimension rows yield NULL attributes
    Left,
}

/// Price band used by the rental reports.
pub fn price_tier(price: f64) -> &'static str {
    if price < 2.0 {
        "budget"
    } else if price < 3.0 {
        "standard"
    } else {
        "premium"
    }
}

/// Resolves the rental → customer and rental → movie key joins into denormalized rows.
#[derive(Debug, Clone)]
pub struct RentalSource {
    customers: HashMap<u64, CustomerDim>,
    movies: HashMap<u64, MovieDim>,
    join_mode: JoinMode,
    schema: RowSchema,
}

impl RentalSource {
    pub fn new(customers: Vec<CustomerDim>, movies: Vec<MovieDim>, join_mode: JoinMode) -> Self {
        Self {
            customers: customers.into_iter().map(|c| (c.customer_id, c)).collect(),
            movies: movies.into_iter().map(|m| (m.movie_id, m)).collect(),
            join_mode,
            schema: Self::rental_schema(join_mode),
        }
    }

    /// Columns of a denormalized rental row. `price` becomes nullable under a
    /// left join, since it is carried by the movie dimension.
    pub fn rental_schema(join_mode: JoinMode) -> RowSchema {
        let built = RowSchema::builder()
            .attribute("rental_id", LogicalType::Integer)
            .attribute("customer_id", LogicalType::Integer)
            .attribute("movie_id", LogicalType::Integer)
            .attribute("rental_date", LogicalType::Date)
            .attribute("country", LogicalType::String)
            .attribute("gender", LogicalType::String)
            .attribute("birth_decade", LogicalType::Integer)
            .attribute("genre", LogicalType::String)
            .attribute("year_of_release", LogicalType::Integer)
            .attribute("price_tier", LogicalType::String)
            .measure("price", LogicalType::Float, 2, join_mode == JoinMode::Left)
            .measure("rating", LogicalType::Integer, 0, true)
            .build();
        match built {
            Ok(schema) => schema,
            Err(e) => unreachable!("static rental schema is valid: {e}"),
        }
    }

    pub fn schema(&self) -> &RowSchema {
        &self.schema
    }

    pub fn join_mode(&self) -> JoinMode {
        self.join_mode
    }

    pub fn denormalize(&self, fact: &FactRow) -> Result<Row, EngineError> {
        let customer = self.customers.get(&fact.customer_id);
        let movie = self.movies.get(&fact.movie_id);

        if self.join_mode == JoinMode::Strict {
            if customer.is_none() {
                return Err(ReferentialError::MissingCustomer {
                    rental_id: fact.rental_id,
                    customer_id: fact.customer_id,
                }
                .into());
            }
            if movie.is_none() {
                return Err(ReferentialError::MissingMovie {
                    rental_id: fact.rental_id,
                    movie_id: fact.movie_id,
                }
                .into());
            }
        }

        if let Some(rating) = fact.rating.filter(|r| !(1..=10).contains(r)) {
            return Err(TypeError::RatingOutOfRange {
                rental_id: fact.rental_id,
                rating,
            }
            .into());
        }

        let birth_decade = customer
            .and_then(|c| c.date_of_birth)
            .map(|dob| i64::from(dob.year()).div_euclid(10) * 10);

        self.schema
            .row()
            .set("rental_id", fact.rental_id)
            .set("customer_id", fact.customer_id)
            .set("movie_id", fact.movie_id)
            .set("rental_date", fact.rental_date)
            .set("country", customer.and_then(|c| c.country.clone()))
            .set("gender", customer.and_then(|c| c.gender.clone()))
            .set("birth_decade", birth_decade)
            .set("genre", movie.and_then(|m| m.genre.clone()))
            .set("year_of_release", movie.and_then(|m| m.year_of_release))
            .set("price_tier", movie.map(|m| price_tier(m.renting_price)))
            .set("price", movie.map(|m| m.renting_price))
            .set("rating", fact.rating.map(i64::from))
            .build()
    }

    /// Lazily denormalizes `facts`; each item fails independently. A rental id
    /// seen earlier in the slice yields `DuplicateRental`.
    pub fn rows<'a>(
        &'a self,
        facts: &'a [FactRow],
    ) -> impl Iterator<Item = Result<Row, EngineError>> + 'a {
        let mut seen = HashSet::with_capacity(facts.len());
        facts.iter().map(move |fact| {
            if !seen.insert(fact.rental_id) {
                return Err(ReferentialError::DuplicateRental(fact.rental_id).into());
            }
            self.denormalize(fact)
        })
    }

    /// Materializes all rows, stopping at the first failing fact.
    pub fn load(&self, facts: &[FactRow]) -> Result<Vec<Row>, EngineError> {
        let rows = self.rows(facts).collect::<Result<Vec<_>, _>>()?;
        debug!(rows = rows.len(), join = ?self.join_mode, "Denormalized rental rows");
        Ok(rows)
    }
}
