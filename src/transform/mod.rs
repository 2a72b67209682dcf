pub mod clean_and_transform;
