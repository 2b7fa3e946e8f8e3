//! Career pages watched by every run.
//!
//! | Group | Extractor |
//! |-------|-----------|
//! | Banks & consulting | RBC structured, the rest generic |
//! | Product & scale-ups | generic |
//! | Remote-first Canada tech | generic |
//! | Government & defence | generic |
//!
//! Adding a site with a stable listing layout means adding a
//! [`ListingSelectors`] entry here; no new code path is needed.

use crate::models::{ListingSelectors, Site};

/// Selectors for the RBC careers search results.
pub const RBC_LISTINGS: ListingSelectors = ListingSelectors {
    listing: "li.job-result",
    title: "h3.job-title",
    location: ".job-location",
    link: "a",
    base_url: "https://jobs.rbc.com",
    location_filter: "halifax",
};

pub static SITES: &[Site] = &[
    // Banks & consulting
    Site::structured(
        "RBC",
        "https://jobs.rbc.com/ca/en/search-results?keywords=devops&location=Halifax",
        RBC_LISTINGS,
    ),
    Site::generic("Scotiabank", "https://jobs.scotiabank.com/search/?q=devops&location=Halifax"),
    Site::generic("TD Bank", "https://jobs.td.com/en-CA/search-results/?keywords=devops&location=Halifax"),
    Site::generic("Deloitte", "https://careers.deloitte.ca/search/?q=devops&location=Halifax"),
    Site::generic("CGI", "https://cgi.njoyn.com/CGI/xweb/XWeb.asp?NTKN=c&clid=21001&Page=JobList&lang=1"),
    Site::generic("EY", "https://careers.ey.com/ey/search/?q=devops&locationsearch=halifax"),
    Site::generic("Accenture", "https://www.accenture.com/ca-en/careers/jobsearch?jk=devops&lc=halifax"),
    Site::generic("IBM", "https://www.ibm.com/ca-en/employment/"),
    Site::generic("NTT Data", "https://careers-inc.nttdata.com/job-search-results/?keywords=devops&location=Halifax"),
    Site::generic("Cognizant", "https://careers.cognizant.com/global/en/search-results?keywords=devops&location=Halifax"),
    Site::generic("Microsoft", "https://careers.microsoft.com/us/en/search-results?keywords=devops&location=Halifax"),
    Site::generic("Amazon", "https://www.amazon.jobs/en/search?base_query=devops&location=halifax"),
    Site::generic("Google", "https://careers.google.com/jobs/results/?location=Halifax&q=devops"),
    Site::generic("Oracle", "https://www.oracle.com/corporate/careers/jobs?keyword=devops&location=halifax"),
    // Product & scale-ups
    Site::generic("REDspace", "https://jobs.lever.co/redspace"),
    Site::generic("Dash Hudson", "https://www.dashhudson.com/careers"),
    Site::generic("Proposify", "https://www.proposify.com/careers"),
    Site::generic("Milk Moovement", "https://milkmoovement.com/careers"),
    Site::generic("MOBIA", "https://www.mobia.io/careers"),
    Site::generic("CarteNav Solutions", "https://www.cartenav.com/careers/"),
    Site::generic("GeoSpectrum", "https://geospectrum.ca/careers"),
    Site::generic("ResMed", "https://resmed.wd3.myworkdayjobs.com/ResMedJobs"),
    // Remote-first Canada tech
    Site::generic(
        "CrowdStrike",
        "https://crowdstrike.wd5.myworkdayjobs.com/CrowdStrikeCareers?locations=6d6b7d53094f01d1c63237f24db0c35d",
    ),
    Site::generic("Affirm", "https://boards.greenhouse.io/affirm"),
    Site::generic("Verafin", "https://verafin.com/careers"),
    Site::generic("Introhive", "https://jobs.lever.co/introhive"),
    // Government & defence
    Site::generic("Irving Shipbuilding", "https://www.shipsforcanada.ca/en/home/careers"),
    Site::generic("Lockheed Martin", "https://www.lockheedmartinjobs.com/search-jobs/DevOps/Halifax/694/1"),
];
