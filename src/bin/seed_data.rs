//! Seed data script - populates the database with a small demo catalogue
//!
//! Run with: cargo run --bin seed-data -- --reset
//!
//! This creates:
//! - 4 categories and 4 vehicles
//! - 2 stores, each with one branch (Asunción, San Lorenzo)
//! - 3 parts with vehicle compatibility
//! - 4 stock rows

use std::sync::Arc;

use chrono::NaiveTime;
use clap::Parser;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseConnection, EntityTrait, TransactionTrait};
use tracing::info;

use repuestos_locator::{
    db::{self, DbConfig},
    dto::{
        CategoriaRequest, RepuestoRequest, RepuestoSucursalRequest, SucursalRequest, TiendaRequest,
        VehiculoRequest,
    },
    entities::{branch, category, part, part_vehicle, professional, stock, store, vehicle},
    geo::GeoPoint,
    handlers::AppServices,
    hours::WeekdaySet,
};

#[derive(Debug, Parser)]
#[command(name = "seed-data", about = "Populate the locator database with demo data")]
struct Args {
    /// Database to seed
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://repuestos.db?mode=rwc")]
    database_url: String,

    /// Delete every existing row before seeding
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    info!("=== Repuestos Locator Seed Data ===");

    info!("Connecting to database: {}", args.database_url);
    let pool = db::establish_connection_with_config(&DbConfig {
        url: args.database_url.clone(),
        max_connections: 5,
        ..Default::default()
    })
    .await?;
    db::run_migrations(&pool).await?;

    if args.reset {
        info!("Clearing existing data...");
        clear(&pool).await?;
    }

    let services = AppServices::new(Arc::new(pool));
    let catalog = services.catalog.clone();
    let locations = services.locations.clone();

    // Categories
    info!("Creating categories...");
    let mut category_ids = Vec::new();
    for nombre in ["Frenos", "Motor", "Suspensión", "Electrónica"] {
        let created = catalog
            .create_category(CategoriaRequest {
                nombre: nombre.to_string(),
                descripcion: None,
            })
            .await?;
        category_ids.push(created.id);
    }
    let (frenos, motor) = (category_ids[0], category_ids[1]);

    // Vehicles
    info!("Creating vehicles...");
    let mut vehicle_ids = Vec::new();
    for (marca, modelo, anio) in [
        ("Toyota", "Corolla", 2010),
        ("Toyota", "Corolla", 2015),
        ("Ford", "Focus", 2012),
        ("Ford", "Focus", 2018),
    ] {
        let created = catalog
            .create_vehicle(VehiculoRequest {
                marca: marca.to_string(),
                modelo: modelo.to_string(),
                anio,
            })
            .await?;
        vehicle_ids.push(created.id);
    }
    let (corolla_2010, corolla_2015, focus_2012, focus_2018) =
        (vehicle_ids[0], vehicle_ids[1], vehicle_ids[2], vehicle_ids[3]);

    // Stores and branches
    info!("Creating stores and branches...");
    let weekdays = WeekdaySet::parse("LUN,MAR,MIE,JUE,VIE")?;
    let mut with_saturday = weekdays;
    with_saturday.insert(repuestos_locator::hours::DayCode::Sab);
    let opening = NaiveTime::from_hms_opt(8, 0, 0);
    let closing = NaiveTime::from_hms_opt(18, 0, 0);

    let central = locations
        .create_store(TiendaRequest {
            nombre: "Repuestos Central".into(),
            logo_url: None,
            email: Some("contacto@repuestocentral.com".into()),
            telefono: Some("987654321".into()),
            dias_atencion: Some("Lunes a Sábado".into()),
            tiene_delivery: true,
            direccion: Some("Calle Palma 123, Asunción".into()),
            ubicacion: Some(GeoPoint::new(-57.6479, -25.2965)),
            hora_apertura: opening,
            hora_cierre: closing,
            dias_semana: with_saturday,
        })
        .await?;
    let asuncion = locations
        .create_branch(SucursalRequest {
            tienda_id: central.id,
            nombre: "Sucursal Asunción".into(),
            direccion: "Calle Palma 123, Asunción".into(),
            telefono: Some("987654321".into()),
            ubicacion: GeoPoint::new(-57.6479, -25.2965),
            tiene_delivery: true,
            hora_apertura: opening,
            hora_cierre: closing,
            dias_semana: with_saturday,
        })
        .await?;

    let sur = locations
        .create_store(TiendaRequest {
            nombre: "Repuestos del Sur".into(),
            logo_url: None,
            email: Some("sur@repuestos.com".into()),
            telefono: Some("123456789".into()),
            dias_atencion: Some("Lunes a Viernes".into()),
            tiene_delivery: false,
            direccion: Some("Ruta 2, km 15, San Lorenzo".into()),
            ubicacion: Some(GeoPoint::new(-57.5000, -25.3400)),
            hora_apertura: opening,
            hora_cierre: closing,
            dias_semana: weekdays,
        })
        .await?;
    let san_lorenzo = locations
        .create_branch(SucursalRequest {
            tienda_id: sur.id,
            nombre: "Sucursal San Lorenzo".into(),
            direccion: "Ruta 2, km 15, San Lorenzo".into(),
            telefono: Some("123456789".into()),
            ubicacion: GeoPoint::new(-57.5000, -25.3400),
            tiene_delivery: false,
            hora_apertura: opening,
            hora_cierre: closing,
            dias_semana: weekdays,
        })
        .await?;

    // Parts
    info!("Creating parts...");
    let pastillas = catalog
        .create_part(RepuestoRequest {
            nombre: "Pastillas de Freno Delanteras".into(),
            descripcion: Some("Pastillas de freno de cerámica para un rendimiento óptimo.".into()),
            categoria_id: Some(frenos),
            imagen_url: None,
            compatibilidad_ids: vec![corolla_2010, focus_2012],
        })
        .await?;
    let disco = catalog
        .create_part(RepuestoRequest {
            nombre: "Disco de Freno".into(),
            descripcion: Some("Disco de freno ventilado de alto rendimiento.".into()),
            categoria_id: Some(frenos),
            imagen_url: None,
            compatibilidad_ids: vec![corolla_2015],
        })
        .await?;
    let filtro = catalog
        .create_part(RepuestoRequest {
            nombre: "Filtro de Aceite".into(),
            descripcion: Some("Filtro de aceite de larga duración.".into()),
            categoria_id: Some(motor),
            imagen_url: None,
            compatibilidad_ids: vec![corolla_2010, focus_2012, corolla_2015, focus_2018],
        })
        .await?;

    // Inventory
    info!("Creating inventory...");
    let rows = [
        (asuncion.id, pastillas.repuesto.id, dec!(150000.00), 10, 2),
        (asuncion.id, filtro.repuesto.id, dec!(50000.00), 25, 5),
        (san_lorenzo.id, pastillas.repuesto.id, dec!(145000.00), 8, 3),
        (san_lorenzo.id, disco.repuesto.id, dec!(250000.00), 5, 1),
    ];
    for (sucursal_id, repuesto_global_id, precio, stock, stock_minimo) in rows {
        catalog
            .create_stock(RepuestoSucursalRequest {
                sucursal_id,
                repuesto_global_id,
                precio,
                stock,
                stock_minimo,
            })
            .await?;
    }
    info!("  Created {} stock rows", rows.len());

    info!("=== Seed Data Complete ===");
    info!("Try these:");
    info!("  curl 'http://localhost:8080/api/repuestos/?marca=Toyota&modelo=Corolla&anio=2015'");
    info!("  curl http://localhost:8080/api/tiendas/");
    info!("  open http://localhost:8080/");

    Ok(())
}

/// Deletes every row, children first.
async fn clear(pool: &DatabaseConnection) -> anyhow::Result<()> {
    let txn = pool.begin().await?;
    stock::Entity::delete_many().exec(&txn).await?;
    part_vehicle::Entity::delete_many().exec(&txn).await?;
    part::Entity::delete_many().exec(&txn).await?;
    branch::Entity::delete_many().exec(&txn).await?;
    store::Entity::delete_many().exec(&txn).await?;
    vehicle::Entity::delete_many().exec(&txn).await?;
    category::Entity::delete_many().exec(&txn).await?;
    professional::Entity::delete_many().exec(&txn).await?;
    txn.commit().await?;
    Ok(())
}
