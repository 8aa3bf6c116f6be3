pub mod ranked;
