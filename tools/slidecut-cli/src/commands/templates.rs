//! List transition templates.

use slidecut_common::config::AppConfig;
use slidecut_templates::{Template, TemplateSelector};

use super::{describe_plan, rng};

pub fn run(config: &AppConfig, seed: Option<u64>, json: bool) -> anyhow::Result<()> {
    let selector = TemplateSelector::for_image_count(config.render.image_count);
    let mut rng = rng(seed);

    let plans = selector
        .available()
        .into_iter()
        .map(|template| selector.plan_for(template, &mut rng))
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    println!("Templates ({} transitions each):", selector.slots());
    for plan in &plans {
        let sampled = plan
            .template
            .parse::<Template>()
            .map(Template::is_sampled)
            .unwrap_or(false);
        let note = if sampled { " (re-sampled every run)" } else { "" };
        println!("  {:<8} {}{}", plan.template, describe_plan(plan), note);
    }
    for template in Template::ALL {
        if !selector.supports(template) {
            println!(
                "  {:<8} unavailable: needs {} distinct transitions, catalog has {}",
                template.as_str(),
                selector.slots(),
                selector.catalog().len()
            );
        }
    }

    Ok(())
}
