fn main() {
    prop_pipeline::cli::run();
}
