pub mod popup;
pub mod text_input;
