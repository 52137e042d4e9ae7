pub mod admin_pass;
