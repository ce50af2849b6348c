pub mod cage;
