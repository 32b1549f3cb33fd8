mod health_check;
mod helper;
mod product;
