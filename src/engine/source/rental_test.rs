use chrono::NaiveDate;

use crate::engine::errors::{EngineError, ReferentialError, TypeError};
use crate::engine::source::{CustomerDim, FactRow, JoinMode, MovieDim, RentalSource, price_tier};
use crate::engine::types::ScalarValue;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn customers() -> Vec<CustomerDim> {
    vec![
        CustomerDim {
            customer_id: 1,
            country: Some("Spain".into()),
            gender: Some("female".into()),
            date_of_birth: Some(date(1987, 6, 2)),
        },
        CustomerDim {
            customer_id: 2,
            country: None,
            gender: Some("male".into()),
            date_of_birth: None,
        },
    ]
}

fn movies() -> Vec<MovieDim> {
    vec![
        MovieDim {
            movie_id: 10,
            genre: Some("Drama".into()),
            year_of_release: Some(2015),
            renting_price: 2.99,
        },
        MovieDim {
            movie_id: 11,
            genre: Some("Comedy".into()),
            year_of_release: None,
            renting_price: 1.59,
        },
    ]
}

fn fact(rental_id: u64, customer_id: u64, movie_id: u64, rating: Option<u8>) -> FactRow {
    FactRow {
        rental_id,
        customer_id,
        movie_id,
        rating,
        rental_date: date(2024, 5, 20),
    }
}

fn value<'a>(source: &RentalSource, row: &'a crate::engine::schema::Row, column: &str) -> &'a ScalarValue {
    row.value(source.schema().column_index(column).unwrap())
}

#[test]
fn price_tiers() {
    assert_eq!(price_tier(1.59), "budget");
    assert_eq!(price_tier(2.0), "standard");
    assert_eq!(price_tier(2.99), "standard");
    assert_eq!(price_tier(3.0), "premium");
}

#[test]
fn denormalizes_joined_attributes() {
    let source = RentalSource::new(customers(), movies(), JoinMode::Strict);
    let row = source.denormalize(&fact(1, 1, 10, Some(8))).unwrap();

    assert_eq!(value(&source, &row, "country"), &ScalarValue::from("Spain"));
    assert_eq!(value(&source, &row, "birth_decade"), &ScalarValue::Int64(1980));
    assert_eq!(value(&source, &row, "genre"), &ScalarValue::from("Drama"));
    assert_eq!(value(&source, &row, "price_tier"), &ScalarValue::from("standard"));
    assert_eq!(value(&source, &row, "rating"), &ScalarValue::Int64(8));
    assert_eq!(value(&source, &row, "rental_date"), &ScalarValue::Date(date(2024, 5, 20)));
    // price is measure 0 at scale 2
    assert_eq!(row.scaled_measure(0), Some(299));
    assert_eq!(row.scaled_measure(1), Some(8));
}

#[test]
fn missing_dimension_values_stay_null() {
    let source = RentalSource::new(customers(), movies(), JoinMode::Strict);
    let row = source.denormalize(&fact(2, 2, 11, None)).unwrap();
    assert!(value(&source, &row, "country").is_null());
    assert!(value(&source, &row, "birth_decade").is_null());
    assert!(value(&source, &row, "year_of_release").is_null());
    assert_eq!(row.scaled_measure(1), None);
}

#[test]
fn strict_join_rejects_unknown_keys() {
    let source = RentalSource::new(customers(), movies(), JoinMode::Strict);
    let err = source.denormalize(&fact(3, 9, 10, None)).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Referential(ReferentialError::MissingCustomer {
            rental_id: 3,
            customer_id: 9
        })
    ));

    let err = source.denormalize(&fact(4, 1, 99, None)).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Referential(ReferentialError::MissingMovie {
            rental_id: 4,
            movie_id: 99
        })
    ));
}

#[test]
fn left_join_yields_null_attributes() {
    let source = RentalSource::new(customers(), movies(), JoinMode::Left);
    assert_eq!(source.join_mode(), JoinMode::Left);
    let row = source.denormalize(&fact(5, 9, 99, Some(3))).unwrap();
    assert!(value(&source, &row, "country").is_null());
    assert!(value(&source, &row, "genre").is_null());
    assert!(value(&source, &row, "price_tier").is_null());
    assert!(value(&source, &row, "price").is_null());
    assert_eq!(row.scaled_measure(0), None);
    assert_eq!(value(&source, &row, "customer_id"), &ScalarValue::Int64(9));
}

#[test]
fn load_rejects_duplicate_rental_ids() {
    let source = RentalSource::new(customers(), movies(), JoinMode::Strict);
    let err = source
        .load(&[fact(1, 1, 10, None), fact(1, 2, 11, None)])
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Referential(ReferentialError::DuplicateRental(1))
    ));

    let rows = source
        .load(&[fact(1, 1, 10, None), fact(2, 2, 11, Some(4))])
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn rows_iterator_fails_per_item() {
    let source = RentalSource::new(customers(), movies(), JoinMode::Strict);
    let facts = [fact(1, 1, 10, None), fact(2, 7, 10, None), fact(3, 2, 11, None)];
    let results: Vec<bool> = source.rows(&facts).map(|r| r.is_ok()).collect();
    assert_eq!(results, vec![true, false, true]);
}

#[test]
fn rows_iterator_rejects_repeated_rental_ids() {
    let source = RentalSource::new(customers(), movies(), JoinMode::Strict);
    let facts = [fact(7, 1, 10, None), fact(7, 2, 11, Some(3)), fact(8, 2, 11, None)];
    let results: Vec<_> = source.rows(&facts).collect();
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(EngineError::Referential(ReferentialError::DuplicateRental(7)))
    ));
    assert!(results[2].is_ok());
}

#[test]
fn ratings_outside_one_to_ten_are_rejected() {
    let source = RentalSource::new(customers(), movies(), JoinMode::Strict);
    for rating in [0u8, 11, 200] {
        let err = source.denormalize(&fact(1, 1, 10, Some(rating))).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Type(TypeError::RatingOutOfRange { rental_id: 1, rating: r }) if r == rating
        ));
    }
    assert!(source.denormalize(&fact(1, 1, 10, Some(1))).is_ok());
    assert!(source.denormalize(&fact(2, 1, 10, Some(10))).is_ok());
    assert!(source.load(&[fact(3, 1, 10, Some(200))]).is_err());
}
