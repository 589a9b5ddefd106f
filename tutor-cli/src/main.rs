use anyhow::{Context, Result};
use tutor_shared::{AskRequest, AskResponse, ChatMessage, DEFAULT_MODEL};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let mut model = DEFAULT_MODEL.to_string();
    let mut words = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--model" {
            model = args.next().context("--model requires a value")?;
        } else {
            words.push(arg);
        }
    }
    let question = words.join(" ");
    if question.is_empty() {
        anyhow::bail!("usage: tutor [--model NAME] QUESTION");
    }

    let server_url =
        std::env::var("TUTOR_SERVER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());

    let request = AskRequest {
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: question,
        }],
        model,
    };

    let response = reqwest::Client::new()
        .post(format!("{server_url}/ask"))
        .json(&request)
        .send()
        .await
        .with_context(|| format!("failed to reach the relay at {server_url}"))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("relay returned {status}: {body}");
    }

    let answer: AskResponse = response.json().await?;
    println!("{}", answer.response);

    Ok(())
}
