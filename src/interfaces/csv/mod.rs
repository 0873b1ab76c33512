pub mod seed_reader;

pub use seed_reader::SeedReader;
