// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps one wire `Request` onto a live `Broker` call and back onto a
//! `Response`. This is the only place that depends on both
//! `qjb-engine` and `qjb-wire`; neither depends on the other.

use qjb_core::BrokerError;
use qjb_engine::{Broker, ConfigQuery};
use qjb_wire::{Request, Response};

pub fn dispatch(broker: &Broker, request: Request) -> Response {
    match request {
        Request::Put { queue, id, data, now, priority, tags, delay } => {
            match broker.put(&queue, &id, data, now, priority, tags, delay) {
                Ok(id) => Response::Id { id },
                Err(err) => error_response(err),
            }
        }
        Request::Peek { queue, count, now } => Response::Jobs { jobs: broker.peek(&queue, count, now) },
        Request::Pop { queue, worker, count, now, expires } => {
            Response::Jobs { jobs: broker.pop(&queue, &worker, count, now, expires) }
        }
        Request::Heartbeat { id, worker, now, data } => {
            match broker.heartbeat(&id, &worker, now, data) {
                Ok(Some(expires)) => Response::Expiry { expires },
                Ok(None) => Response::Rejected,
                Err(err) => error_response(err),
            }
        }
        Request::Complete { id, worker, queue, now, next, delay, data } => {
            match broker.complete(&id, &worker, &queue, now, next.as_deref(), delay, data) {
                Ok(Some(outcome)) => Response::Completed { outcome: outcome.as_str().to_string() },
                Ok(None) => Response::Rejected,
                Err(err) => error_response(err),
            }
        }
        Request::Fail { id, worker, group, message, now, data } => {
            match broker.fail(&id, &worker, &group, &message, now, data) {
                Ok(Some(group)) => Response::Failed { group },
                Ok(None) => Response::Rejected,
                Err(err) => error_response(err),
            }
        }
        Request::Cancel { id } => {
            broker.cancel(&id);
            Response::Cancelled
        }
        Request::Get { id } => Response::Job { job: broker.get(&id) },
        Request::GetConfig { name } => match broker.getconfig(name.as_deref()) {
            Some(ConfigQuery::Value(value)) => Response::ConfigValue { value: Some(value) },
            Some(ConfigQuery::All(values)) => Response::ConfigAll { values },
            None => Response::ConfigValue { value: None },
        },
        Request::SetConfig { name, value } => {
            broker.setconfig(&name, value);
            Response::ConfigSet
        }
        Request::Queues { now } => Response::Queues { queues: broker.queues(now) },
        Request::Failed { group, start, limit } => match group {
            None => Response::FailedCounts { counts: broker.failed_counts() },
            Some(group) => match broker.failed_page(&group, start, limit) {
                Ok(page) => page.into(),
                Err(err) => error_response(err),
            },
        },
        Request::Stats { queue, date } => Response::Stats { stats: broker.stats(&queue, date) },
        Request::Track { id } => {
            broker.track(&id);
            Response::Tracking
        }
        Request::Untrack { id } => {
            broker.untrack(&id);
            Response::Tracking
        }
        Request::TrackedAll => broker.tracked().into(),
    }
}

fn error_response(err: BrokerError) -> Response {
    Response::Error { message: err.to_string() }
}
