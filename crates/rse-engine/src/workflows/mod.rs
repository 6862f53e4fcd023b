pub mod backtest;
pub mod race;
