pub(super) const INDEX_HTML: &str = r#"<!DOCTYPE html>
  <html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
    <title>Flood prediction</title>
    <link
      rel="stylesheet"
      href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css"
      integrity="sha256-p4NxAoJBhIIN+hmNHrzRCf9tD/miZyoHS5obTRR9BMY="
      crossorigin=""
    />
    <style>
      body { font-family: sans-serif; margin: 0; padding: 20px; }
      #map { height: 600px; width: 100%; }
      .panel {
        padding: 20px;
        background: #f4f4f4;
        border-radius: 8px;
        box-shadow: 0 0 10px rgba(0,0,0,0.1);
        margin-top: 20px;
      }
      .row { display: flex; align-items: center; margin-bottom: 10px; }
      .row input { width: 60px; margin: 0 10px 0 5px; }
      button { padding: 5px 10px; border: none; border-radius: 4px; color: #fff; cursor: pointer; }
      .add { background: #28a745; }
      .remove { background: #dc3545; margin-left: 10px; }
      #chartContainer { height: 400px; position: relative; }
      #simulation .simulation-display {
        margin: 0 auto;
        background: #fff;
        border: 2px dashed #ccc;
        display: flex;
        flex-direction: column;
        justify-content: center;
        align-items: center;
      }
    </style>
  </head>
  <body>
    <div id="map"></div>

    <div class="panel">
      <h2>Adjust Model Parameters</h2>
      <div id="timeline"></div>
      <h3>Add New Time Point</h3>
      <div class="row">
        <label>Time:<input type="number" id="newTime" value="0" /></label>
        <label>Rainfall:<input type="number" id="newRainfall" value="50" /></label>
        <button class="add" id="addPoint">Add</button>
      </div>
      <div id="chartContainer"><canvas id="chart"></canvas></div>
    </div>

    <div class="panel" id="simulationPanel">
      <h2>Simulation Results</h2>
      <div id="simulation"></div>
    </div>

    <script
      src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"
      integrity="sha256-20nQCchB9co0qIjJZRGuk2/Z9VM+kNiyxNV1lvTlZBo="
      crossorigin=""
    ></script>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>

    <script>
      const map = L.map('map').setView([-36.751697, 174.754], 15);
      const markerLayer = L.layerGroup().addTo(map);

      // markers are placed server side for the current zoom
      async function drawMarkers() {
        const res = await fetch(`/markers?zoom=${map.getZoom()}`);
        const markers = await res.json();
        markerLayer.clearLayers();
        markers.forEach(({ id, center, radius, color }) => {
          L.circleMarker(center, { radius, color })
            .on('click', async () => {
              await fetch(`/catchpits/${encodeURIComponent(id)}/toggle`, { method: 'POST' });
              drawMarkers();
            })
            .addTo(markerLayer);
        });
      }

      async function initOverlay() {
        const res = await fetch('/overlay');
        if (!res.ok) {
          // catchpits not loaded, nothing to draw
          return;
        }
        const overlay = await res.json();
        map.setView(overlay.center, overlay.zoom);
        L.imageOverlay(overlay.image_url, overlay.bounds, { opacity: overlay.opacity }).addTo(map);
        await drawMarkers();
        map.on('zoomend', drawMarkers);
      }

      // Rainfall timeline
      const chart = new Chart(document.getElementById('chart'), {
        type: 'line',
        data: { labels: [], datasets: [{
          label: 'Rainfall',
          data: [],
          borderColor: 'rgba(75,192,192,1)',
          fill: false,
          stepped: 'before',
          tension: 0,
          pointRadius: 6,
        }] },
        options: {
          responsive: true,
          maintainAspectRatio: false,
          scales: {
            x: { title: { display: true, text: 'Time (hours)' } },
            y: { title: { display: true, text: 'Rainfall (mm)' } },
          },
        },
      });

      function renderTimeline(points) {
        const container = document.getElementById('timeline');
        container.innerHTML = '';
        points.forEach((point, index) => {
          const row = document.createElement('div');
          row.className = 'row';
          row.innerHTML = `
            <label>Time:<input type="number" value="${point.time}" data-field="time" /></label>
            <label>Rainfall:<input type="number" value="${point.rainfall}" data-field="rainfall" /></label>
            <button class="remove">Remove</button>`;
          row.querySelectorAll('input').forEach(input => {
            input.addEventListener('change', () =>
              send('PUT', `/timeline/${index}`, { field: input.dataset.field, value: input.value }));
          });
          row.querySelector('button').addEventListener('click', () => send('DELETE', `/timeline/${index}`));
          container.appendChild(row);
        });
        chart.data.labels = points.map(p => p.time);
        chart.data.datasets[0].data = points.map(p => p.rainfall);
        chart.update();
      }

      async function send(method, url, body) {
        const res = await fetch(url, {
          method,
          headers: body ? { 'Content-Type': 'application/json' } : {},
          body: body ? JSON.stringify(body) : undefined,
        });
        if (res.ok) {
          renderTimeline(await res.json());
        } else {
          console.error(await res.text());
        }
      }

      document.getElementById('addPoint').addEventListener('click', async () => {
        const time = document.getElementById('newTime');
        const rainfall = document.getElementById('newRainfall');
        await send('POST', '/timeline', { time: time.value, rainfall: rainfall.value });
        time.value = 0;
        rainfall.value = 50;
      });

      // drag chart points: send whole 5px steps per axis, keep the remainder
      const STEP = 5;
      let drag = null;
      const canvas = document.getElementById('chart');
      canvas.addEventListener('mousedown', e => {
        const hit = chart.getElementsAtEventForMode(e, 'nearest', { intersect: true }, false);
        if (hit.length) drag = { index: hit[0].index, x: e.clientX, y: e.clientY };
      });
      window.addEventListener('mousemove', e => {
        if (!drag) return;
        const deltaX = Math.trunc((e.clientX - drag.x) / STEP) * STEP;
        const deltaY = Math.trunc((e.clientY - drag.y) / STEP) * STEP;
        if (deltaX === 0 && deltaY === 0) return;
        drag.x += deltaX;
        drag.y += deltaY;
        send('POST', `/timeline/${drag.index}/drag`, { deltaX, deltaY });
      });
      window.addEventListener('mouseup', () => { drag = null; });

      // Simulation viewer
      async function initSimulation() {
        const res = await fetch('/simulation');
        const viewer = await res.json();
        document.getElementById('simulation').innerHTML = viewer.html;
        if (viewer.kind !== 'unity') return;

        const script = document.createElement('script');
        script.src = viewer.assets.loaderUrl;
        script.onload = () => {
          const progress = document.getElementById('unity-progress');
          createUnityInstance(document.getElementById('unity-canvas'), {
            dataUrl: viewer.assets.dataUrl,
            frameworkUrl: viewer.assets.frameworkUrl,
            codeUrl: viewer.assets.codeUrl,
          }, p => {
            progress.textContent = viewer.progress_template.replace('{percent}', Math.round(p * 100));
          }).then(() => progress.remove()).catch(console.error);
        };
        document.body.appendChild(script);
      }

      initOverlay().catch(console.error);
      fetch('/timeline').then(r => r.json()).then(renderTimeline).catch(console.error);
      initSimulation().catch(console.error);
    </script>
  </body>
  </html>
"#;
