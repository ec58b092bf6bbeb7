fn main() {
    if let Err(err) = csv_sql_importer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
