pub mod delimiter;
