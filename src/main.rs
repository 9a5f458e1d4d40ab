use clap::Parser;
use colored::Colorize;
use library_catalog::{
    Book, BookUpdate, CatalogReport, Library, LibraryConfig, LibraryError, Status,
    error::LibraryResult,
};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the library catalog demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log rejected operations as well as successful ones
    #[arg(short, long)]
    verbose: bool,

    /// Print search results and the final catalog as JSON
    #[arg(long)]
    json: bool,

    /// Maximum number of books a member may hold at once (at most 3)
    #[arg(long, default_value_t = library_catalog::config::DEFAULT_BORROW_LIMIT)]
    borrow_limit: usize,
}

/// Dune's ISBN, touched by several sections
const DUNE: &str = "978-0-345-39180-3";

/// Install the stderr subscriber; `RUST_LOG` overrides the flag
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<(), LibraryError> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = LibraryConfig::default().with_borrow_limit(args.borrow_limit);
    let mut library = Library::with_config(config);
    library.register_default_observers();

    println!("{}", "Mini Library Management System Demo".green().bold());
    println!("{}", "=".repeat(60));

    section("1. Adding Books");
    show(&library.add_book("978-0-7475-3269-9", "Harry Potter", "J.K. Rowling", "Fiction", 5));
    show(&library.add_book("978-0-553-29335-0", "1984", "George Orwell", "Fiction", 3));
    show(&library.add_book(DUNE, "Dune", "Frank Herbert", "Sci-Fi", 4));
    show(&library.add_book("978-0-062-31609-8", "Sapiens", "Yuval Noah Harari", "Non-Fiction", 2));
    show(&library.add_book("978-0-000-00000-0", "Untitled", "Nobody", "Romance", 1));
    println!("\nTotal books in library: {}", library.book_count());

    section("2. Adding Members");
    show(&library.add_member("M001", "Alice Johnson", "alice@email.com"));
    show(&library.add_member("M002", "Bob Smith", "bob@email.com"));
    show(&library.add_member("M003", "Carol Davis", "carol@email.com"));
    println!("\nTotal members: {}", library.member_count());

    section("3. Searching Books");
    for query in ["Harry", "Orwell"] {
        let results = library.search_books(query);
        print_results(query, &results, args.json)?;
    }

    section("4. Borrowing Books");
    show(&library.borrow_book("M001", "978-0-7475-3269-9"));
    show(&library.borrow_book("M001", "978-0-553-29335-0"));
    show(&library.borrow_book("M002", DUNE));
    println!("\nAlice's borrowed books: {:?}", library.borrowed_books("M001").unwrap_or_default());

    section("5. Testing Borrow Limits");
    for attempt in 1..=3 {
        let (ok, message) = library.borrow_book("M003", "978-0-062-31609-8").status();
        println!("Attempt {attempt}: {}", mark(ok, &message));
    }

    section("6. Returning Books");
    show(&library.return_book("M001", "978-0-7475-3269-9"));
    println!(
        "Alice's borrowed books after return: {:?}",
        library.borrowed_books("M001").unwrap_or_default()
    );

    section("7. Updating Book Details");
    show(&library.update_book(DUNE, &BookUpdate::new().total_copies(6).available_copies(5)));
    if let Some(dune) = library.book(DUNE) {
        println!(
            "Updated Dune: title={}, total_copies={}, available_copies={}",
            dune.title, dune.total_copies, dune.available_copies
        );
    }

    section("8. Testing Delete Operations");
    show(&library.delete_book("978-0-553-29335-0"));
    show(&library.delete_member("M001"));
    show(&library.return_book("M001", "978-0-553-29335-0"));
    show(&library.delete_member("M001"));
    println!("\nTotal members after deletion: {}", library.member_count());

    section("9. Catalog");
    if args.json {
        println!("{}", CatalogReport::to_json(&library)?);
    } else {
        print!("{}", CatalogReport::render_text(&library));
    }
    let history: Vec<_> = library.history().iter().cloned().collect();
    println!("\n{}", CatalogReport::history_table(&history));

    println!("\n{}", "Demo completed successfully".green().bold());
    Ok(())
}

/// Print a section banner
fn section(title: &str) {
    println!("\n{}", title.yellow().bold());
    println!("{}", "-".repeat(60));
}

/// Print the outcome of an operation
fn show(result: &LibraryResult) {
    let (ok, message) = result.status();
    println!("{}", mark(ok, &message));
}

/// Colour a message by outcome
fn mark(ok: bool, message: &str) -> String {
    if ok { format!("{} {message}", "[ok]".green()) } else { format!("{} {message}", "[fail]".red()) }
}

/// Print search results as lines or JSON
fn print_results(query: &str, results: &[Book], json: bool) -> Result<(), LibraryError> {
    println!("Search results for '{query}': {} found", results.len());
    if json {
        println!("{}", CatalogReport::json(results)?);
    } else {
        for book in results {
            println!("  - {}", CatalogReport::book_line(book));
        }
    }
    Ok(())
}
