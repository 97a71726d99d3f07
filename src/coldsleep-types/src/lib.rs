pub mod activities;
pub mod cold_bath;
pub mod sleep;
pub mod window;
