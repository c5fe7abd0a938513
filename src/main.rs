fn main() {
    elfc::app::cli::run();
}
