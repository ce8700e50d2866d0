pub const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Financial Detective</title>
<style>
  body { font-family: Inter, sans-serif; max-width: 1100px; margin: 2rem auto; color: #1e293b; }
  h1 { color: #1f77b4; text-align: center; }
  textarea { width: 100%; height: 16rem; }
  pre { background: #f8f9fa; padding: 1rem; overflow: auto; max-height: 30rem; }
  .metrics span { display: inline-block; margin-right: 2rem; font-weight: 600; }
  .error { color: #d62728; }
  #png { max-width: 100%; border: 1px solid #e2e8f0; }
  .downloads a { margin-right: 1.5rem; }
</style>
</head>
<body>
<h1>Financial Detective</h1>
<p>Extract a knowledge graph of companies, risk factors and amounts from a financial document.</p>

<label>Provider
  <select id="provider"><option value="groq">groq</option><option value="openai">openai</option></select>
</label>
<span id="keys"></span>
<p><input type="file" id="file" accept=".txt,.md"></p>
<textarea id="text" placeholder="Paste annual report text here..."></textarea>
<p><button id="run">Extract Knowledge Graph</button> <span id="status"></span></p>

<details><summary>Document preview</summary><pre id="preview"></pre></details>
<div class="metrics" id="metrics"></div>
<h3>Knowledge Graph</h3><img id="png" alt="Knowledge graph" hidden><span id="png-status"></span>
<h3>Relationships</h3><pre id="edges"></pre>
<h3>Mermaid</h3><pre id="mermaid"></pre>
<h3>JSON</h3><pre id="json"></pre>
<p class="downloads">
  <a id="download" download="graph_output.json" hidden>Download graph_output.json</a>
  <a id="download-png" download="graph_visualization.png" hidden>Download graph_visualization.png</a>
  <a id="download-mermaid" download="graph_mermaid.md" hidden>Download graph_mermaid.md</a>
</p>

<script>
const $ = (id) => document.getElementById(id);
const offer = (id, blob) => {
  const link = $(id);
  if (link.href) URL.revokeObjectURL(link.href);
  link.href = URL.createObjectURL(blob);
  link.hidden = false;
};

async function showPng(doc) {
  $('png-status').textContent = 'Rendering graph...';
  const resp = await fetch('/render/png', {
    method: 'POST',
    headers: {'content-type': 'application/json'},
    body: JSON.stringify(doc),
  });
  if (!resp.ok) {
    $('png-status').textContent = (await resp.json()).error;
    $('png-status').className = 'error';
    return;
  }
  const blob = await resp.blob();
  $('png-status').textContent = '';
  $('png-status').className = '';
  if ($('png').src) URL.revokeObjectURL($('png').src);
  $('png').src = URL.createObjectURL(blob);
  $('png').hidden = false;
  offer('download-png', blob);
}

fetch('/health').then(r => r.json()).then(h => {
  $('keys').textContent = h.providers.map(p => `${p.provider}: ${p.api_key_configured ? 'key found' : 'no key'}`).join(' | ');
  $('provider').value = h.default_provider;
});

$('file').addEventListener('change', async (e) => {
  const f = e.target.files[0];
  if (f) $('text').value = await f.text();
});

$('run').addEventListener('click', async () => {
  $('status').textContent = 'Extracting...';
  $('status').className = '';
  const resp = await fetch('/extract', {
    method: 'POST',
    headers: {'content-type': 'application/json'},
    body: JSON.stringify({text: $('text').value, provider: $('provider').value}),
  });
  const body = await resp.json();
  if (!resp.ok) {
    $('status').textContent = body.path ? `${body.error} (${body.rule})` : body.error;
    $('status').className = 'error';
    return;
  }
  $('status').textContent = body.cached ? 'Done (cached)' : 'Done';
  $('preview').textContent = body.source_preview;
  const s = body.summary;
  $('metrics').innerHTML = `<span>Entities: ${s.total_entities}</span><span>Companies: ${s.companies}</span>` +
    `<span>Amounts: ${s.amounts}</span><span>Risks: ${s.risk_factors}</span><span>Relationships: ${s.total_relationships}</span>`;
  $('edges').textContent = body.relationships.join('\n');
  $('mermaid').textContent = body.mermaid;
  const json = JSON.stringify(body.document, null, 2);
  $('json').textContent = json;
  offer('download', new Blob([json], {type: 'application/json'}));
  offer('download-mermaid', new Blob([body.mermaid], {type: 'text/markdown'}));
  showPng(body.document);
});
</script>
</body>
</html>
"#;
