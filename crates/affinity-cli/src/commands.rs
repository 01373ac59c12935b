//! Command execution. Each command renders its result as pretty JSON, except `path` and
//! `most-friends`, which default to plain-text reports.

use crate::Command;
use affinity_service::{AffinityService, ReaderSource};

pub type CommandResult = Result<String, Box<dyn std::error::Error + Send + Sync>>;

pub async fn run<S: ReaderSource>(
    service: &AffinityService<S>,
    command: Command,
) -> CommandResult {
    let config = service.config().clone();
    let output = match command {
        Command::Path { from, to, json } => {
            let report = service.connection_path(&from, &to).await?;
            if json {
                serde_json::to_string_pretty(&report)?
            } else {
                report.to_string()
            }
        }
        Command::Within { user, hops } => {
            let hops = hops.unwrap_or(config.default_hops);
            let mut found: Vec<String> = service
                .users_within_distance(&user, hops)
                .await
                .into_iter()
                .collect();
            found.sort();
            serde_json::to_string_pretty(&serde_json::json!({
                "user": user,
                "max_hops": hops,
                "readers": found,
            }))?
        }
        Command::Suggest { user, hops } => {
            let hops = hops.unwrap_or(config.default_hops);
            let suggestions = service.suggest_potential_friends(&user, hops).await;
            serde_json::to_string_pretty(&suggestions)?
        }
        Command::Fof { user, limit } => {
            let limit = limit.unwrap_or(config.default_limit);
            serde_json::to_string_pretty(&service.find_friends_of_friends(&user, limit).await)?
        }
        Command::Top { user, limit } => {
            let limit = limit.unwrap_or(config.default_limit);
            serde_json::to_string_pretty(&service.top_connections(&user, limit).await)?
        }
        Command::MostFriends { limit, json } => {
            let limit = limit.unwrap_or(config.default_limit);
            let report = service.most_connected_report(limit).await?;
            if json {
                serde_json::to_string_pretty(&report)?
            } else {
                report.to_string()
            }
        }
        Command::Clusters => serde_json::to_string_pretty(&service.detect_clusters().await)?,
        Command::Stats => serde_json::to_string_pretty(&service.stats().await)?,
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use affinity_service::{AffinityConfig, InMemoryReaderSource, ReaderRecord};

    async fn service() -> AffinityService<InMemoryReaderSource> {
        let source = InMemoryReaderSource::from_readers([
            ReaderRecord::with_id("a", "ana").with_connections(["b"]),
            ReaderRecord::with_id("b", "ben").with_connections(["c"]),
            ReaderRecord::with_id("c", "cat"),
            ReaderRecord::with_id("z", "zoe"),
        ])
        .await;
        AffinityService::connect(source, AffinityConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn path_text_and_json() {
        let svc = service().await;
        let text = run(
            &svc,
            Command::Path {
                from: "a".into(),
                to: "c".into(),
                json: false,
            },
        )
        .await
        .unwrap();
        assert!(text.contains("Degrees of separation: 2"));

        let json = run(
            &svc,
            Command::Path {
                from: "a".into(),
                to: "z".into(),
                json: true,
            },
        )
        .await
        .unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["connected"], false);
    }

    #[tokio::test]
    async fn within_uses_default_hops_and_sorts() {
        let svc = service().await;
        let out = run(
            &svc,
            Command::Within {
                user: "a".into(),
                hops: None,
            },
        )
        .await
        .unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["max_hops"], 3);
        assert_eq!(v["readers"], serde_json::json!(["b", "c"]));
    }

    #[tokio::test]
    async fn clusters_and_stats() {
        let svc = service().await;
        let out = run(&svc, Command::Clusters).await.unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v, serde_json::json!([["a", "b", "c"], ["z"]]));

        let out = run(&svc, Command::Stats).await.unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["connection_count"], 2);
        assert_eq!(v["isolated_count"], 1);
    }

    #[tokio::test]
    async fn unknown_reader_path_is_error() {
        let svc = service().await;
        let err = run(
            &svc,
            Command::Path {
                from: "a".into(),
                to: "nobody".into(),
                json: false,
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("nobody"));
    }

    #[tokio::test]
    async fn most_friends_text_and_json() {
        let svc = service().await;
        let text = run(
            &svc,
            Command::MostFriends {
                limit: Some(1),
                json: false,
            },
        )
        .await
        .unwrap();
        assert!(text.starts_with("READERS WITH MOST FRIENDS"));
        assert!(text.contains("1. ben\n   Friend count: 2"));

        let json = run(
            &svc,
            Command::MostFriends {
                limit: Some(1),
                json: true,
            },
        )
        .await
        .unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["readers"][0]["id"], "b");
        assert_eq!(v["readers"][0]["username"], "ben");
        assert_eq!(v["readers"][0]["friend_count"], 2);
    }

    #[tokio::test]
    async fn top_ranks_by_weight() {
        let svc = service().await;
        svc.add_connection("b", "z", 5.0).await.unwrap();
        let out = run(
            &svc,
            Command::Top {
                user: "b".into(),
                limit: Some(1),
            },
        )
        .await
        .unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v[0]["id"], "z");
        assert_eq!(v[0]["score"], 5.0);
    }
}
