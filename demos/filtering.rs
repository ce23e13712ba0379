//! Shows each kind of filter clause and the query string it produces.
//!
//! Run with: `ONE_API_TOKEN=... cargo run --example filtering`

use one_api::endpoint::Endpoint;
use one_api::model::{Character, Movie};
use one_api::query::{Direction, Filter, Operator, Options};
use one_api::{Client, Error, Token};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("one_api=info,filtering=info")
        .init();

    let client = Client::new()?;
    let token = Token::from_env()?;

    let hobbits = Options::new()
        .limit(10)
        .sort(Direction::Ascending, "name")
        .filter(Filter::matching("race", "Hobbit"));
    show_characters(&client, &token, "Hobbits", &hobbits).await?;

    let not_orcs = Options::new()
        .limit(5)
        .filter(Filter::not_matching("race", "Orc,Goblin"))
        .filter(Filter::exists("spouse"));
    show_characters(&client, &token, "Married non-orcs", &not_orcs).await?;

    let by_regex = Options::new().filter(Filter::matching("name", "/foot/i"));
    show_characters(&client, &token, "Names containing 'foot'", &by_regex).await?;

    let expensive = Options::new()
        .sort(Direction::Descending, "budgetInMillions")
        .filter(Filter::compare("budgetInMillions", Operator::Gt, 100.0));
    println!("=== Big-budget movies {} ===", expensive);
    let movies = client
        .fetch::<Movie>(&token, Endpoint::Movies(None), Some(&expensive))
        .await?;
    for movie in movies.into_inner() {
        println!("{}: ${}M", movie.name, movie.budget_in_millions);
    }

    Ok(())
}

async fn show_characters(
    client: &Client,
    token: &Token,
    title: &str,
    options: &Options,
) -> Result<(), Error> {
    println!("=== {} {} ===", title, options);
    let response = client
        .fetch::<Character>(token, Endpoint::Characters(None), Some(options))
        .await?;
    println!("{} of {} (took {:?})", response.docs.len(), response.total, response.latency);
    for character in &response.docs {
        println!("- {}", character.name);
    }
    println!();
    Ok(())
}
