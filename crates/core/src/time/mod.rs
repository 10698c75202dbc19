pub mod weeks;
