//! The embedded dashboard page.
//!
//! One static HTML document; all numbers arrive through the JSON API after
//! load, so the page itself never goes stale. Panel div ids match the field
//! names of [`crate::state::ChartSet`].

/// The dashboard, served at `/`.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1.0,maximum-scale=1.2,minimum-scale=0.5">
<title>CBD Tracker</title>
<script src="https://cdn.plot.ly/plotly-2.32.0.min.js"></script>
<style>
  body {
    margin: 0;
    font-family: "Poppins-Light", "Poppins", sans-serif;
    background-color: white;
  }
  .header {
    background-color: #2f4f4f;
    color: whitesmoke;
    padding: 24px 32px;
  }
  .header-title { margin-top: 0; }
  .header a { color: greenyellow; }
  .header-description { max-width: 1100px; }
  #stale-note {
    color: #ffb347;
    display: none;
  }
  .charts { padding: 0 32px 32px; }
  select#manufacturer-dropdown {
    width: 65.8%;
    background-color: whitesmoke;
    font-size: 1rem;
    padding: 6px;
    margin-bottom: 16px;
  }
  .chart {
    border-bottom: 10px solid lightsteelblue;
    max-width: 1350px;
    min-height: 450px;
  }
</style>
</head>
<body>
<div class="header">
  <h1 id="title" class="header-title">CBD Novel Food Applications Tracker <br>(Live Updates)</h1>
  <p class="header-description">To ensure regulatory compliance in the UK's CBD market, the
    <a href="https://www.food.gov.uk/business-guidance/cbd-products-linked-to-novel-food-applications"
       target="_blank">Food Standards Agency (FSA)</a>
    required that all companies involved in the sale of CBD products, which were already on the
    market before 13/02/20, submit novel food applications by 31/03/21. At this stage,
    applications granted the status 'validated' proceed to the risk assessment phase, while
    applications marked as 'removed' are not allowed for sale in the UK.</p>
  <p class="header-description">What does the CBD novel food applications tracker do?</p>
  <ol class="header-description">
    <li><b>Real Time:</b> the tracker checks for updates to the FSA database every 15 minutes</li>
    <li><b>Comprehensive Overview:</b> get a clear overview of the current status of all applications</li>
    <li><b>Estimated Finish Date:</b> get an estimate of when all applications are likely to be processed based on historical data</li>
    <li><b>Company Search:</b> easily find the application status for any company that has applied for a CBD novel foods license</li>
    <li><b>Key Players:</b> identify the companies with the highest number of applications</li>
    <li><b>Product Variety:</b> insights into the different types of CBD products submitted for novel food applications</li>
  </ol>
  <p class="header-description">
    <a href="https://data.food.gov.uk/cbd-products/products-list" target="_blank">FSA database of CBD novel food applications</a>
    last updated: <b id="last-updated">&ndash;</b>
  </p>
  <p id="stale-note">The feed is temporarily unavailable; showing the last good data.</p>
  <h2>Search a company to view the status of all their applications</h2>
  <select id="manufacturer-dropdown">
    <option value="">Loading companies&hellip;</option>
  </select>
</div>
<div class="charts">
  <div id="status-pie" class="chart"></div>
  <div id="projection" class="chart"></div>
  <div id="top_applications" class="chart"></div>
  <div id="top_validated" class="chart"></div>
  <div id="categories" class="chart"></div>
  <div id="dosages" class="chart"></div>
</div>
<script>
async function fetchJson(path) {
  const response = await fetch(path);
  if (!response.ok) {
    throw new Error(path + ': ' + response.status);
  }
  return response.json();
}

function renderHeader(summary) {
  if (summary.last_updated) {
    const [year, month, day] = summary.last_updated.split('-');
    document.getElementById('last-updated').textContent =
      day + '/' + month + '/' + year.slice(2);
  }
  document.getElementById('stale-note').style.display =
    summary.feed.stale ? 'block' : 'none';
}

function renderCharts(charts) {
  for (const [panel, figure] of Object.entries(charts)) {
    Plotly.react(panel, figure.data, figure.layout, {responsive: true});
  }
}

function renderDropdown(summary, manufacturers) {
  const dropdown = document.getElementById('manufacturer-dropdown');
  const selected = dropdown.value;
  dropdown.innerHTML = '';
  const placeholder = document.createElement('option');
  placeholder.value = '';
  placeholder.textContent =
    summary.companies + ' companies, ' + summary.applications + ' applications';
  dropdown.appendChild(placeholder);
  for (const name of manufacturers) {
    const option = document.createElement('option');
    option.value = name;
    option.textContent = name;
    dropdown.appendChild(option);
  }
  dropdown.value = selected;
}

async function renderStatusPie(manufacturer) {
  const query = manufacturer
    ? '?manufacturer=' + encodeURIComponent(manufacturer)
    : '';
  const figure = await fetchJson('/api/charts/status' + query);
  Plotly.react('status-pie', figure.data, figure.layout, {responsive: true});
}

async function refresh() {
  const [summary, manufacturers, charts] = await Promise.all([
    fetchJson('/api/summary'),
    fetchJson('/api/manufacturers'),
    fetchJson('/api/charts'),
  ]);
  renderHeader(summary);
  renderDropdown(summary, manufacturers);
  renderCharts(charts);
}

const dropdown = document.getElementById('manufacturer-dropdown');
dropdown.addEventListener('change', () => {
  renderStatusPie(dropdown.value).catch(console.error);
});

refresh()
  .then(() => renderStatusPie(''))
  .catch(console.error);

// Pick up server-side refreshes without reloading the page.
setInterval(() => {
  refresh()
    .then(() => renderStatusPie(dropdown.value))
    .catch(console.error);
}, 5 * 60 * 1000);
</script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_has_a_panel_for_every_chart() {
        for panel in [
            "status-pie",
            "projection",
            "top_applications",
            "top_validated",
            "categories",
            "dosages",
        ] {
            assert!(
                INDEX_HTML.contains(&format!("id=\"{panel}\"")),
                "missing panel {panel}"
            );
        }
    }

    #[test]
    fn test_page_wires_the_dropdown_to_the_pie_endpoint() {
        assert!(INDEX_HTML.contains("manufacturer-dropdown"));
        assert!(INDEX_HTML.contains("/api/charts/status"));
        assert!(INDEX_HTML.contains("cdn.plot.ly"));
    }
}
