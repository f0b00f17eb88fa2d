pub mod explodes;
