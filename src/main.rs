fn main() {
    sightly::projects::cli::start_cli();
}
