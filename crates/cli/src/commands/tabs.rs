//! `tabs` and `all-tabs`.

use chrono::Local;
use tracing::{info, warn};
use webtotext::{Extraction, Pipeline, RawDocument};
use webtotext_runtime::{CdpFetcher, FetchError, PageSource, TabInfo, TabSelector, Target};

use crate::commands::{Completed, finish};
use crate::config::Settings;
use crate::error::Result;
use crate::output::{AllTabsData, CommandInputs, CommandResult, ResultBuilder, TabOutcome, TabsData};
use crate::save::{TabSection, all_tabs_file_name, combined_document, write_text_file};

fn inputs(settings: &Settings) -> CommandInputs {
	CommandInputs {
		endpoint: Some(settings.endpoint.to_string()),
		..CommandInputs::default()
	}
}

pub async fn run_list(settings: &Settings) -> CommandResult<TabsData> {
	let builder = ResultBuilder::new("tabs").inputs(inputs(settings));
	let outcome = settings.fetcher().list_tabs().await.map(|tabs| {
		Completed::new(TabsData {
			count: tabs.len(),
			tabs,
		})
	});
	finish(builder, outcome.map_err(Into::into))
}

pub async fn run_all(settings: &Settings) -> CommandResult<AllTabsData> {
	info!(target = "webtotext", endpoint = %settings.endpoint, "all-tabs");
	let builder = ResultBuilder::new("all-tabs").inputs(CommandInputs {
		mode: Some(settings.mode.to_string()),
		..inputs(settings)
	});
	finish(builder, extract_all(settings).await)
}

async fn extract_all(settings: &Settings) -> Result<Completed<AllTabsData>> {
	let pipeline = settings.pipeline()?;
	let fetcher = settings.fetcher();
	let tabs = fetcher.list_tabs().await?;
	if tabs.is_empty() {
		return Err(FetchError::NoTabs.into());
	}

	let mut results = Vec::with_capacity(tabs.len());
	for tab in &tabs {
		let result = extract_tab(&fetcher, &pipeline, settings, tab).await;
		if let Err(reason) = &result {
			warn!(tab = %tab.id, url = %tab.url, %reason, "tab extraction failed");
		}
		results.push(result);
	}

	let outcomes: Vec<TabOutcome> = tabs
		.iter()
		.zip(&results)
		.map(|(tab, result)| TabOutcome {
			index: tab.index,
			title: tab.title.clone(),
			url: tab.url.clone(),
			ok: result.is_ok(),
			blocks: result.as_ref().map(|e| e.blocks.len()).unwrap_or(0),
			error: result.as_ref().err().cloned(),
		})
		.collect();

	let sections: Vec<TabSection<'_>> = tabs
		.iter()
		.zip(&results)
		.map(|(tab, result)| TabSection {
			title: &tab.title,
			url: &tab.url,
			body: match result {
				Ok(extraction) => Ok(extraction.output.text.as_str()),
				Err(reason) => Err(reason.as_str()),
			},
		})
		.collect();

	let now = Local::now();
	let document = combined_document(&sections, settings.mode, now);
	let failed = outcomes.iter().filter(|o| !o.ok).count();

	let mut done = Completed::new(AllTabsData {
		extracted: outcomes.len() - failed,
		failed,
		tabs: outcomes,
		path: None,
		content: None,
	});

	if settings.save {
		let artifact = write_text_file(&settings.output_dir, &all_tabs_file_name(settings.mode, now), &document, settings.mode)?;
		done.data.path = Some(artifact.path.clone());
		done.artifacts.push(artifact);
	}
	if failed > 0 {
		done.warnings.push(format!("{failed} of {} tabs could not be extracted", tabs.len()));
	}
	if settings.print {
		done.data.content = Some(document);
	}
	Ok(done)
}

/// One tab, start to finish. Failures are reported as text so the run can
/// carry on with the next tab.
async fn extract_tab(fetcher: &CdpFetcher, pipeline: &Pipeline, settings: &Settings, tab: &TabInfo) -> std::result::Result<Extraction, String> {
	if !tab.attachable {
		return Err("tab is attached to another debugger".to_string());
	}
	let page = fetcher
		.fetch(&Target::Tab(TabSelector::Id(tab.id.clone())))
		.await
		.map_err(|e| e.to_string())?;
	pipeline
		.run_with_metadata(&RawDocument::new(page.html, Some(page.url)), settings.mode)
		.map_err(|e| e.to_string())
}
