use anyhow::Context;
use sugi_api::{Essay, EssayId, Uuid};

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long)]
    host: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// List the most recent essays
    List {
        /// How many essays to show at most
        #[structopt(short, long)]
        limit: Option<usize>,
    },

    /// Delete essays by id
    Delete {
        /// Ids of the essays to delete
        ids: Vec<Uuid>,
    },
}

fn admin_token() -> anyhow::Result<String> {
    std::env::var("ADMIN_TOKEN").context("retrieving ADMIN_TOKEN environment variable")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opt = <Opt as structopt::StructOpt>::from_args();

    let client = reqwest::Client::new();

    match opt.cmd {
        Command::List { limit } => {
            let mut req = client.get(format!("{}/api/essays", opt.host));
            if let Some(limit) = limit {
                req = req.query(&[("limit", limit)]);
            }
            let essays = req
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<Essay>>()
                .await
                .context("parsing essay list")?;
            for e in essays {
                println!(
                    "{}  {}  {:>5} chars  {:>3} likes  {:>3} comments  {}",
                    e.id.0,
                    e.created_at.format("%Y-%m-%d %H:%M"),
                    e.content_len(),
                    e.likes_count,
                    e.comments_count,
                    e.nickname.as_deref().unwrap_or("(anonymous)"),
                );
            }
        }
        Command::Delete { ids } => {
            let token = admin_token()?;
            for id in ids {
                let id = EssayId(id);
                client
                    .delete(format!("{}/api/essays/{}", opt.host, id.0))
                    .bearer_auth(&token)
                    .send()
                    .await?
                    .error_for_status()
                    .with_context(|| format!("deleting essay {}", id.0))?;
                println!("deleted {}", id.0);
            }
        }
    }

    Ok(())
}
