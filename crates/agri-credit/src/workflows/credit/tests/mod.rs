mod common;

mod classifier;
mod routing;
