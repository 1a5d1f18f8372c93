use chrono::NaiveDate;

use crate::engine::schema::Row;
use crate::test_helpers::factories::RowFactory;

pub struct RentalFactory;

impl RentalFactory {
    /// The three-row customer example: (1, 2.00, 8), (1, 3.00, NULL), (2, 1.00, 5)
    pub fn customer_example() -> Vec<Row> {
        vec![
            RowFactory::new()
                .with("rental_id", 1)
                .with("customer_id", 1)
                .with("price", 2.0)
                .with("rating", 8)
                .create(),
            RowFactory::new()
                .with("rental_id", 2)
                .with("customer_id", 1)
                .with("price", 3.0)
                .with("rating", None::<i64>)
                .create(),
            RowFactory::new()
                .with("rental_id", 3)
                .with("customer_id", 2)
                .with("price", 1.0)
                .with("rating", 5)
                .create(),
        ]
    }

    /// `per_cell` rows for every (country, genre) pair, prices cycling 1.00..=4.00,
    /// every third rating missing and dates spread over the first quarter of 2024.
    pub fn grid(countries: &[&str], genres: &[&str], per_cell: usize) -> Vec<Row> {
        let mut rows = Vec::new();
        let mut id = 0i64;
        for country in countries {
            for genre in genres {
                for _ in 0..per_cell {
                    id += 1;
                    let rating = if id % 3 == 0 { None } else { Some(id % 10 + 1) };
                    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(id % 90);
                    rows.push(
                        RowFactory::new()
                            .with("rental_id", id)
                            .with("customer_id", id % 7 + 1)
                            .with("movie_id", id % 5 + 1)
                            .with("country", *country)
                            .with("genre", *genre)
                            .with("rental_date", day)
                            .with("price", (id % 4 + 1) as f64)
                            .with("rating", rating)
                            .create(),
                    );
                }
            }
        }
        rows
    }
}
