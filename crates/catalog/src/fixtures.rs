//! Demonstration inventory of the showroom.
//!
//! Until a listings API exists, the catalog is seeded with these records.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use agrofierros_core::ListingId;

use crate::listing::{Listing, ListingDetails, ListingStatus, SpecValue, TransactionKind};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .map(|n| n.and_utc())
        .unwrap_or_default()
}

/// Deterministic id for seeded record `n`.
pub fn seed_id(n: u128) -> ListingId {
    ListingId::from_uuid(Uuid::from_u128(n))
}

struct Seed {
    n: u128,
    details: ListingDetails,
    created_at: DateTime<Utc>,
}

#[allow(clippy::too_many_arguments)]
fn seed(
    n: u128,
    (name, brand, model): (&str, &str, &str),
    price: u64,
    kind: TransactionKind,
    year: u16,
    description: &str,
    condition: &str,
    origin: &str,
    featured: bool,
    specs: &[(&str, SpecValue)],
    image: &str,
    created_at: DateTime<Utc>,
) -> Seed {
    let mut details = ListingDetails::new(name, brand, model, price, kind);
    details.year = Some(year);
    details.description = description.to_string();
    details.condition = condition.to_string();
    details.origin = Some(origin.to_string());
    details.featured = featured;
    details.status = ListingStatus::Available;
    details.images = vec![image.to_string()];
    details.specifications = specs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    Seed {
        n,
        details,
        created_at,
    }
}

/// The five listings shown on the public site, in catalog order.
pub fn showroom_listings() -> Vec<Listing> {
    let seeds = vec![
        seed(
            1,
            ("Excavadora LiuGong 9035E", "LiuGong", "9035E"),
            75_000,
            TransactionKind::Sale,
            2021,
            "Excavadora LiuGong 9035E con motor Yanmar 3TNV88-BPLY de 21,2 kW (29 hp) a 2400 rpm. Capacidad del cucharón estándar 0,11 m3.",
            "Nuevo",
            "China",
            true,
            &[
                ("motor", "Yanmar 3TNV88-BPLY".into()),
                ("potencia", "21,2 kW (29 hp) a 2400 rpm".into()),
                ("profundidad", "3085 mm".into()),
                ("capacidad", "0,11 m3".into()),
                ("peso", "3980 kg".into()),
            ],
            "https://images.pexels.com/photos/6102167/pexels-photo-6102167.jpeg",
            at(2023, 10, 15, 10, 30),
        ),
        seed(
            2,
            ("Cabezal MacDon FD75", "MacDon", "FD75"),
            64_000,
            TransactionKind::Consignment,
            2017,
            "Cabezal de 35 pies MacDon FD75. Carro fabricación nacional, 2 ejes, como nuevo. Único dueño, muy buen estado, poco uso.",
            "Usado - Muy buen estado",
            "Canadá",
            true,
            &[
                ("ancho", "35 pies".into()),
                ("ano", 2017.0.into()),
                ("origen", "Canadá".into()),
                ("ejes", 2.0.into()),
            ],
            "https://images.pexels.com/photos/2933243/pexels-photo-2933243.jpeg",
            at(2023, 11, 25, 14, 45),
        ),
        seed(
            3,
            ("Retroexcavadora Case CE 580N", "Case", "CE 580N"),
            55_000,
            TransactionKind::Trade,
            2019,
            "Retroexcavadora Case CE 580N. Origen Brasil, 5.617 horas. 4x4, Motor FTP 4 cilindros. Cabina cerrada con aire acondicionado.",
            "Usado - Buen estado",
            "Brasil",
            false,
            &[
                ("motor", "FTP 4 cilindros".into()),
                ("horas", 5617.0.into()),
                ("traccion", "4x4".into()),
                ("cabina", "Cerrada con aire acondicionado".into()),
            ],
            "https://images.pexels.com/photos/6102396/pexels-photo-6102396.jpeg",
            at(2023, 12, 10, 9, 15),
        ),
        seed(
            4,
            ("Tractor Case 580N", "Case", "580N"),
            48_000,
            TransactionKind::Sale,
            2016,
            "Tractor Case 580N con 3.550 horas de uso. Origen Italia, cabina cerrada con aire acondicionado.",
            "Usado - Buen estado",
            "Italia",
            false,
            &[
                ("horas", 3550.0.into()),
                ("origen", "Italia".into()),
                ("cabina", "Cerrada con aire acondicionado".into()),
            ],
            "https://images.pexels.com/photos/8721342/pexels-photo-8721342.jpeg",
            at(2023, 9, 5, 11, 20),
        ),
        seed(
            5,
            ("Minicargadora Case", "Case", "SR210"),
            29_500,
            TransactionKind::Consignment,
            2018,
            "Minicargadora Case SR210 con 1.250 horas de uso. Motor diesel, cabina cerrada con aire acondicionado.",
            "Usado - Muy buen estado",
            "Estados Unidos",
            false,
            &[
                ("horas", 1250.0.into()),
                ("motor", "Diesel".into()),
                ("cabina", "Cerrada con aire acondicionado".into()),
            ],
            "https://images.pexels.com/photos/8721344/pexels-photo-8721344.jpeg",
            at(2023, 8, 18, 15, 40),
        ),
    ];

    seeds
        .into_iter()
        .filter_map(|s| Listing::new(seed_id(s.n), s.details, s.created_at).ok())
        .collect()
}
