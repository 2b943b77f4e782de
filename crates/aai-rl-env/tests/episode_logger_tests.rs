use aai_rl_agent::{RandomActionAgent, RandomActionConfig};
use aai_rl_core::{AaiObservation, Environment};
use aai_rl_env::{
    run_episode, EpisodeLogger, EpisodeLoggerConfig, TraceEnv, TraceEnvConfig, TraceRecord,
};

const EPISODES: usize = 3;
const STEPS: usize = 5;

fn trace() -> TraceEnv {
    let records = (0..EPISODES * STEPS)
        .map(|t| TraceRecord {
            observation: AaiObservation {
                health: 1.0,
                ..Default::default()
            },
            reward: 1.0,
            done: (t + 1) % STEPS == 0,
        })
        .collect();
    TraceEnv::from_records(
        TraceEnvConfig {
            trace_file: "memory".into(),
            looping: false,
        },
        records,
    )
    .unwrap()
}

#[tokio::test]
async fn one_file_per_episode() {
    let tmp = tempfile::tempdir().unwrap();
    let mut env = EpisodeLogger::new(trace(), EpisodeLoggerConfig::new(tmp.path()))
        .await
        .unwrap();
    let mut agent = RandomActionAgent::new(RandomActionConfig {
        seed: Some(42),
        ..Default::default()
    })
    .unwrap();

    for _ in 0..EPISODES {
        let episode = run_episode(&mut env, &mut agent, 100).await.unwrap();
        assert_eq!(episode.steps, STEPS);
    }
    env.close().await.unwrap();

    let mut files: Vec<_> = std::fs::read_dir(env.dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    files.sort();
    assert_eq!(files, vec!["episode_1.csv", "episode_2.csv", "episode_3.csv"]);

    for episode in 1..=EPISODES as u64 {
        let content = std::fs::read_to_string(env.episode_path(episode)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), STEPS + 1);

        // cumulative reward restarts with every file
        let cumulative: Vec<f64> = lines[1..]
            .iter()
            .map(|line| line.split(", ").nth(3).unwrap().parse().unwrap())
            .collect();
        assert_eq!(cumulative, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(lines[STEPS].contains(", true, "));
    }
}
