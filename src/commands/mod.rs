pub mod backtest;
pub mod generate_data;
