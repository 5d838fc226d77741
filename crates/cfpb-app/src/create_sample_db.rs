//! Create sample SQLite database with demo complaints

use std::path::Path;
use rusqlite::{Connection, Result};

const COMPANIES: [(&str, u32); 5] = [
    ("EQUIFAX, INC.", 16_000),
    ("Experian Information Solutions Inc.", 13_500),
    ("TRANSUNION INTERMEDIATE HOLDINGS, INC.", 12_000),
    ("BANK OF AMERICA, NATIONAL ASSOCIATION", 10_500),
    ("Small Credit Union", 800),
];

const PRODUCTS: [(&str, &str); 5] = [
    ("Credit reporting", "Credit reporting"),
    ("Debt collection", "Medical debt"),
    ("Mortgage", "Conventional home mortgage"),
    ("Credit card", "General-purpose credit card"),
    ("Checking or savings account", "Checking account"),
];

const ISSUES: [&str; 5] = [
    "Incorrect information on your report",
    "Attempts to collect debt not owed",
    "Trouble during payment process",
    "Problem with a purchase shown on your statement",
    "Managing an account",
];

const STATES: [&str; 6] = ["CA", "TX", "FL", "NY", "GA", "IL"];

const CHANNELS: [&str; 4] = ["Web", "Referral", "Phone", "Postal mail"];

const RESPONSES: [&str; 4] = [
    "Closed with explanation",
    "Closed with non-monetary relief",
    "Closed with monetary relief",
    "In progress",
];

/// Create and populate a sample complaints database at `path`.
///
/// Returns the number of rows written.
pub fn create_sample_database(path: &Path) -> Result<usize> {
    let mut conn = Connection::open(path)?;

    conn.execute_batch(
        "
        DROP TABLE IF EXISTS cfpb_complaints;
        CREATE TABLE cfpb_complaints (
            complaint_id INTEGER PRIMARY KEY AUTOINCREMENT,
            date_received TEXT NOT NULL,
            product TEXT,
            sub_product TEXT,
            issue TEXT,
            company TEXT,
            state TEXT,
            submitted_via TEXT,
            company_response TEXT,
            timely TEXT,
            consumer_disputed TEXT
        );
        "
    )?;

    let tx = conn.transaction()?;
    let mut written = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO cfpb_complaints (date_received, product, sub_product, issue, company,
                                         state, submitted_via, company_response, timely, consumer_disputed)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        )?;

        let mut rng = 20_240_101u32;
        let base_date = chrono::NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default();

        for (company, count) in COMPANIES {
            for _ in 0..count {
                let date = base_date + chrono::Duration::days((random_int(&mut rng) % 1_095) as i64);
                let product_idx = random_int(&mut rng) as usize % PRODUCTS.len();
                let (product, sub_product) = PRODUCTS[product_idx];

                let timely = if random_float(&mut rng) < 0.97 { "Yes" } else { "No" };
                // most rows leave consumer_disputed blank
                let disputed = match random_int(&mut rng) % 10 {
                    0 => Some("Yes"),
                    1 | 2 => Some("No"),
                    _ => None,
                };

                stmt.execute((
                    date.format("%Y-%m-%d").to_string(),
                    product,
                    sub_product,
                    ISSUES[product_idx],
                    company,
                    STATES[random_int(&mut rng) as usize % STATES.len()],
                    CHANNELS[random_int(&mut rng) as usize % CHANNELS.len()],
                    RESPONSES[random_int(&mut rng) as usize % RESPONSES.len()],
                    timely,
                    disputed,
                ))?;
                written += 1;
            }
        }
    }
    tx.commit()?;

    conn.execute_batch(
        "
        CREATE INDEX IF NOT EXISTS idx_complaints_company ON cfpb_complaints(company);
        CREATE INDEX IF NOT EXISTS idx_complaints_date ON cfpb_complaints(date_received);
        "
    )?;

    Ok(written)
}

fn random_float(seed: &mut u32) -> f64 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    (*seed as f64) / (u32::MAX as f64)
}

fn random_int(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}
