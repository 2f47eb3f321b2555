pub mod composite;
pub mod markup;
pub mod text;
