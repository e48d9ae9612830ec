//! # Demo Catalog Seeder
//!
//! Populates the database with a small demo catalog for development.
//! First-run seeding of the configuration row and sample flats happens
//! automatically on connect; this binary only adds products.
//!
//! ## Usage
//! ```bash
//! cargo run -p kirana-db --bin seed
//! cargo run -p kirana-db --bin seed -- --db ./data/kirana.db
//! ```

use std::env;

use kirana_db::{Database, DbConfig, NewProduct};

/// Demo products: name, barcode, price in paise, stock on hand.
const DEMO_PRODUCTS: &[(&str, Option<&str>, i64, i64)] = &[
    ("Parle-G 250g", Some("8901719104046"), 2500, 48),
    ("Maggi Noodles 70g", Some("8901058000894"), 1400, 60),
    ("Amul Milk 500ml", None, 3000, 24),
    ("Amul Butter 100g", Some("8901262010023"), 5500, 12),
    ("Tata Salt 1kg", Some("8901058000290"), 2800, 30),
    ("Red Label Tea 500g", None, 26000, 15),
    ("Fortune Oil 1L", Some("8901317000011"), 14500, 18),
    ("Colgate 100g", Some("8901314010328"), 5800, 22),
    ("Lux Soap 100g", None, 3500, 40),
    ("Basmati Rice 5kg", None, 42000, 10),
    ("Atta 10kg", None, 45000, 8),
    ("Sugar 1kg", None, 4500, 25),
    ("Dettol 200ml", Some("8901396335608"), 9900, 14),
    ("Surf Excel 1kg", None, 12500, 16),
    ("Britannia Bread", None, 4000, 20),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kirana_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kirana POS Demo Catalog Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kirana_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Kirana POS Demo Catalog Seeder");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    // Connecting runs migrations and first-run seeding (config + flats)
    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations and defaults applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let mut inserted = 0;
    for (name, barcode, price_paise, stock) in DEMO_PRODUCTS {
        let product = NewProduct {
            name: name.to_string(),
            barcode: barcode.map(str::to_string),
            price_paise: *price_paise,
            stock_quantity: *stock,
        };

        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", name, e);
            continue;
        }
        inserted += 1;
    }

    println!("✓ Inserted {} demo products", inserted);
    println!("✓ Seed complete!");

    Ok(())
}
