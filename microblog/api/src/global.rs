use std::sync::Arc;

use common::context::Context;
use microblog_core::{Database, Microblog};

use crate::config::AppConfig;

pub trait GlobalCtx {
	fn ctx(&self) -> &Context;
}

pub trait GlobalConfigProvider<C> {
	fn provide_config(&self) -> &C;
}

pub trait GlobalConfig {
	#[inline(always)]
	fn config<C>(&self) -> &C
	where
		Self: GlobalConfigProvider<C>,
	{
		GlobalConfigProvider::provide_config(self)
	}
}

pub trait GlobalMicroblog {
	type Database: Database;

	fn microblog(&self) -> &Microblog<Self::Database>;
}

pub trait ApiGlobal:
	GlobalCtx + GlobalConfigProvider<AppConfig> + GlobalConfig + GlobalMicroblog + Send + Sync + 'static
{
}

impl<T> ApiGlobal for T where
	T: GlobalCtx + GlobalConfigProvider<AppConfig> + GlobalConfig + GlobalMicroblog + Send + Sync + 'static
{
}

pub struct GlobalState<D> {
	ctx: Context,
	config: AppConfig,
	microblog: Microblog<D>,
}

impl<D: Database> GlobalState<D> {
	pub fn new(config: AppConfig, db: Arc<D>, ctx: Context) -> Self {
		Self {
			microblog: Microblog::new(ctx.clone(), db, config.core_options()),
			config,
			ctx,
		}
	}
}

impl<D> GlobalCtx for GlobalState<D> {
	fn ctx(&self) -> &Context {
		&self.ctx
	}
}

impl<D> GlobalConfigProvider<AppConfig> for GlobalState<D> {
	fn provide_config(&self) -> &AppConfig {
		&self.config
	}
}

impl<D> GlobalConfig for GlobalState<D> {}

impl<D: Database> GlobalMicroblog for GlobalState<D> {
	type Database = D;

	fn microblog(&self) -> &Microblog<D> {
		&self.microblog
	}
}
