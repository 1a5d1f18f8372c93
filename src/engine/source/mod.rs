mod rental;

pub use rental::{CustomerDim, FactRow, JoinMode, MovieDim, RentalSource, price_tier};

#[cfg(test)]
mod rental_test;
