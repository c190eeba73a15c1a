pub mod a030_store;
