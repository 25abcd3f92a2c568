// Catalog: categories, vehicles, parts and per-branch stock
pub mod catalog;

// Stores, branches and professionals
pub mod locations;

// Map projections for the HTML pages
pub mod locator;
