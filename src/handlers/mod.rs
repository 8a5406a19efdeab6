pub mod campaigns;
pub mod generate;
pub mod health;
pub mod images;
pub mod personas;
