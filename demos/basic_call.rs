//! Lists the books and the first chapters of the first one.
//!
//! Run with: `ONE_API_TOKEN=... cargo run --example basic_call`

use one_api::query::Options;
use one_api::{Client, Error, Token};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("one_api=debug,basic_call=info")
        .init();

    let client = Client::new()?;
    let token = Token::from_env()?;

    println!("=== Books ===");
    let Some(books) = client.books(&token, None, None).await else {
        eprintln!("No books returned; see the log for the reason.");
        return Ok(());
    };

    for book in &books.docs {
        println!("{} ({})", book.name, book.id);
    }
    println!();

    if let Some(first) = books.first() {
        println!("=== First chapters of {} ===", first.name);
        let options = Options::new().limit(5);
        if let Some(chapters) = client
            .book_chapters(&token, &first.id, Some(&options))
            .await
        {
            for chapter in chapters {
                println!("- {}", chapter.chapter_name);
            }
        }
    }

    Ok(())
}
