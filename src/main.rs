fn main() {
    bsc::app::cli::run();
}
