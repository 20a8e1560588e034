//! # Sources Crate
//!
//! Concrete movie catalogs the quiz can draw from.
//!
//! ### MovieLens Catalog
//! Serves the pipeline's [`MovieCatalogClient`](pipeline::MovieCatalogClient)
//! from a local MovieLens 1M dataset:
//! - Top catalog: best weighted-rating movies with enough ratings
//! - Genres: the labels from movies.dat, verbatim
//! - Top by genres: movies sharing the most selected genres, best first
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::MovieLensCatalog;
//! use pipeline::MovieCatalogClient;
//!
//! let catalog = MovieLensCatalog::from_dir("data/ml-1m")
//!     .with_catalog_size(250)
//!     .with_min_votes(500);
//!
//! let top = catalog.fetch_top_catalog()?;
//! ```

pub mod movielens;

pub use movielens::MovieLensCatalog;
