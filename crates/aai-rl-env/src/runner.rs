//! Episode driver

use tracing::info;

use aai_rl_core::{Agent, Environment, Episode, Result};

/// Run one episode of `agent` in `env`, stopping after `max_steps` if the
/// environment has not ended it first.
pub async fn run_episode<E, A>(env: &mut E, agent: &mut A, max_steps: usize) -> Result<Episode>
where
    E: Environment,
    A: Agent<Observation = E::Observation, Action = E::Action>,
{
    let mut episode = Episode::start();
    let (mut observation, _info) = env.reset().await?;
    agent.reset();

    while episode.steps < max_steps {
        let action = agent.act(&observation).await?;
        let step = env.step(action).await?;
        episode.record(&step);
        agent.observe(&step).await?;

        if step.is_last() {
            break;
        }
        observation = step.observation;
    }

    if episode.end_time.is_none() {
        episode.truncated = true;
        episode.end_time = Some(chrono::Utc::now());
    }
    info!(
        id = %episode.id,
        reward = episode.total_reward,
        steps = episode.steps,
        "episode finished"
    );
    Ok(episode)
}
